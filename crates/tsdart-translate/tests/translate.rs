//! End-to-end translation tests: TypeScript source in, Dart tokens out.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tsdart_syntax::CompilerHost;
use tsdart_translate::{Error, ErrorKind, translate_files_with, translate_source};

fn dart(code: &str) -> String {
    translate_source("test.ts", code)
        .expect("translation failed")
        .trim()
        .to_string()
}

fn failure(code: &str) -> String {
    match translate_source("test.ts", code) {
        Ok(output) => panic!("expected failure, got {:?}", output),
        Err(err) => err.to_string(),
    }
}

mod statements {
    use super::*;

    #[test]
    fn variable_statement() {
        insta::assert_snapshot!(dart("var x = 1;"), @"var x = 1 ;");
    }

    #[test]
    fn typed_variables() {
        insta::assert_snapshot!(dart("var n: number;"), @"num n ;");
        insta::assert_snapshot!(dart("let s: string = 'a';"), @r#"String s = "a" ;"#);
        insta::assert_snapshot!(dart("const b: boolean = false;"), @"bool b = false ;");
        insta::assert_snapshot!(dart("var d: any = null;"), @"dynamic d = null ;");
    }

    #[test]
    fn variable_statement_ends_line() {
        let output = translate_source("test.ts", "var a;\nvar b;\n").unwrap();
        assert_eq!(output, " var a ;\n var b ;\n");
    }

    #[test]
    fn if_else() {
        insta::assert_snapshot!(dart("if (a) b(); else c();"), @"if ( a ) b ( ) ; else c ( ) ;");
    }

    #[test]
    fn for_loop() {
        insta::assert_snapshot!(
            dart("for (var i = 0; i < n; i++) {}"),
            @"for ( var i = 0 ; i < n ; i ++ ) { }"
        );
    }

    #[test]
    fn for_in_loop() {
        insta::assert_snapshot!(dart("for (var k in o) {}"), @"for ( var k in o ) { }");
    }

    #[test]
    fn while_and_do() {
        insta::assert_snapshot!(dart("while (i < 3) i++;"), @"while ( i < 3 ) i ++ ;");
        insta::assert_snapshot!(
            dart("do { x++; } while (x < 3);"),
            @"do { x ++ ; } while ( x < 3 ) ;"
        );
    }

    #[test]
    fn switch_statement() {
        insta::assert_snapshot!(
            dart("switch (x) { case 1: break; default: y(); }"),
            @"switch ( x ) { case 1 : break ; default : y ( ) ; }"
        );
    }

    #[test]
    fn return_forms() {
        insta::assert_snapshot!(
            dart("function f(): void { return; }"),
            @"void f ( ) { return ; }"
        );
        insta::assert_snapshot!(
            dart("function g(a: number): number { return a; }"),
            @"num g ( num a ) { return a ; }"
        );
    }
}

mod expressions {
    use super::*;

    #[test]
    fn literals() {
        insta::assert_snapshot!(dart("x = 0x1F;"), @"x = 0x1F ;");
        insta::assert_snapshot!(dart("x = /ab+c/g;"), @"x = /ab+c/g ;");
        insta::assert_snapshot!(dart("x = this.y || null || true;"), @"x = this . y || null || true ;");
    }

    #[test]
    fn strings_are_requoted() {
        assert_eq!(dart(r#"s = 'say "hi"';"#), r#"s = "say \"hi\"" ;"#);
        assert_eq!(dart(r#"s = "a$b";"#), r#"s = "a\$b" ;"#);
        assert_eq!(dart(r#"s = "line\n";"#), r#"s = "line\n" ;"#);
    }

    #[test]
    fn operators() {
        insta::assert_snapshot!(dart("x = -y + !z;"), @"x = - y + ! z ;");
        insta::assert_snapshot!(dart("x = (a + b) * c;"), @"x = ( a + b ) * c ;");
        insta::assert_snapshot!(dart("x += a === b;"), @"x += a === b ;");
        insta::assert_snapshot!(dart("x = a ?? b;"), @"x = a ?? b ;");
        insta::assert_snapshot!(dart("a instanceof B;"), @"a instanceof B ;");
    }

    #[test]
    fn conditional_and_access() {
        insta::assert_snapshot!(dart("a = b ? c : d[0].e;"), @"a = b ? c : d [ 0 ] . e ;");
    }

    #[test]
    fn calls_and_new() {
        insta::assert_snapshot!(dart("var p = new Point(1, 2);"), @"var p = new Point ( 1 , 2 ) ;");
        insta::assert_snapshot!(dart("var q = new Point;"), @"var q = new Point ( ) ;");
        insta::assert_snapshot!(dart("console.log(x);"), @"console . log ( x ) ;");
    }

    #[test]
    fn list_separators() {
        for count in 1..5 {
            let args: Vec<String> = (0..count).map(|i| format!("a{}", i)).collect();
            let output = dart(&format!("f({});", args.join(", ")));
            assert_eq!(output.matches(',').count(), count - 1, "{}", output);
        }
    }
}

mod declarations {
    use super::*;

    #[test]
    fn class_with_constructor() {
        insta::assert_snapshot!(
            dart("class A extends B { constructor() {} }"),
            @"class A extends B { A ( ) { } }"
        );
    }

    #[test]
    fn class_members() {
        let code = "class P<T extends Q> implements I, J {\n  x: number = 1;\n  y;\n  m(a: string, b = 2): T { return a; }\n}\n";
        insta::assert_snapshot!(
            dart(code),
            @"class P < T extends Q > implements I , J { num x = 1 ; var y ; T m ( String a , [ b = 2 ] ) { return a ; } }"
        );
    }

    #[test]
    fn generic_type_reference() {
        insta::assert_snapshot!(dart("var m: Map<string, number>;"), @"Map < String , num > m ;");
    }

    #[test]
    fn default_parameter_with_type() {
        insta::assert_snapshot!(
            dart("function f(x: number = 1) {}"),
            @"f ( [ num x = 1 ] ) { }"
        );
    }

    #[test]
    fn exported_declarations() {
        insta::assert_snapshot!(dart("export function f() {}"), @"f ( ) { }");
        insta::assert_snapshot!(dart("export class C {}"), @"class C { }");
    }
}

mod comments {
    use super::*;

    #[test]
    fn comment_before_function_appears_once() {
        let output = dart("var a = 1;\n// note\nfunction f(): void {}\n");
        assert_eq!(output, "var a = 1 ;\n // note\n void f ( ) { }");
        assert_eq!(output.matches("// note").count(), 1);
    }

    #[test]
    fn shared_leading_comment_emitted_once() {
        let output = dart("// shared\nfoo();\n");
        assert_eq!(output, "// shared\n foo ( ) ;");
    }

    #[test]
    fn block_comment_without_newline() {
        let output = dart("var a;\n/* inline */ var b;\n");
        assert_eq!(output, "var a ;\n /* inline */ var b ;");
    }

    #[test]
    fn trailing_file_comment_kept() {
        let output = translate_source("test.ts", "var a;\n// end\n").unwrap();
        assert_eq!(output, " var a ;\n // end\n");
    }

    #[test]
    fn same_line_comment_dropped() {
        let output = dart("var a; // trailing\nvar b;\n");
        assert_eq!(output, "var a ;\n var b ;");
    }

    #[test]
    fn comments_inside_blocks() {
        let output = dart("function f() {\n  // inside\n  g();\n}\n");
        assert_eq!(output, "f ( ) { // inside\n g ( ) ; }");
    }
}

mod errors {
    use super::*;

    #[test]
    fn generic_function() {
        assert_eq!(
            failure("function f<T>(x: T): T { return x; }"),
            "test.ts:0:0: generic functions are unsupported"
        );
    }

    #[test]
    fn generic_method() {
        assert_eq!(
            failure("class A { m<T>(x: T) {} }"),
            "test.ts:0:10: generic methods are unsupported"
        );
    }

    #[test]
    fn rest_parameter() {
        assert_eq!(
            failure("function f(...xs) {}"),
            "test.ts:0:11: rest parameters are unsupported"
        );
    }

    #[test]
    fn unary_keyword_operators() {
        assert_eq!(
            failure("var a = 1;\ndelete a.b;"),
            "test.ts:1:0: delete operator is unsupported"
        );
        assert_eq!(failure("x = void 0;"), "test.ts:0:4: void operator is unsupported");
        assert_eq!(failure("  typeof y;"), "test.ts:0:2: typeof operator is unsupported");
    }

    #[test]
    fn unsupported_construct_names_its_kind() {
        assert_eq!(
            failure("var f = () => 1;"),
            "test.ts:0:8: Unsupported node type arrow_function"
        );
        assert_eq!(
            failure("\ninterface I {}"),
            "test.ts:1:0: Unsupported node type interface_declaration"
        );
    }

    #[test]
    fn error_kind_is_unsupported_construct() {
        let Err(Error::Translate(err)) = translate_source("test.ts", "typeof y;") else {
            panic!("expected translation error");
        };
        assert_eq!(err.kind, ErrorKind::UnsupportedConstruct);
        assert_eq!(err.location.line, 0);
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        let result = translate_source("test.ts", "var = ;");
        assert!(matches!(result, Err(Error::Parse(_))));
    }
}

#[derive(Default)]
struct MemoryHost {
    files: HashMap<PathBuf, String>,
}

impl MemoryHost {
    fn with(mut self, path: &str, text: &str) -> Self {
        self.files.insert(PathBuf::from(path), text.to_string());
        self
    }
}

impl CompilerHost for MemoryHost {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

#[test]
fn program_concatenates_in_reference_order() {
    let host = MemoryHost::default()
        .with("main.ts", "/// <reference path=\"lib.ts\" />\nvar a = 1;\n")
        .with("lib.ts", "var b = 2;\n");
    let output = translate_files_with(&host, &[PathBuf::from("main.ts")]).unwrap();
    assert_eq!(
        output,
        " var b = 2 ;\n /// <reference path=\"lib.ts\" />\n var a = 1 ;\n"
    );
}

#[test]
fn comment_cursor_resets_between_files() {
    let host = MemoryHost::default()
        .with("a.ts", "var a;\n\n\n\n// late in a\nvar b;\n")
        .with("b.ts", "// early in b\nvar c;\n");
    let output =
        translate_files_with(&host, &[PathBuf::from("a.ts"), PathBuf::from("b.ts")]).unwrap();
    assert_eq!(
        output,
        " var a ;\n // late in a\n var b ;\n // early in b\n var c ;\n"
    );
}

#[test]
fn program_error_names_failing_file() {
    let host = MemoryHost::default()
        .with("ok.ts", "var a;\n")
        .with("bad.ts", "var b;\ntypeof b;\n");
    let err = translate_files_with(&host, &[PathBuf::from("ok.ts"), PathBuf::from("bad.ts")])
        .unwrap_err();
    assert_eq!(err.to_string(), "bad.ts:1:0: typeof operator is unsupported");
}

#[test]
fn output_is_deterministic() {
    let code = "// c\nclass A { x: number; f(a) { return a + 1; } }\n";
    assert_eq!(dart(code), dart(code));
}

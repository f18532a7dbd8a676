//! Operator tokens and their source spelling.

/// Binary and assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Plus,
    Minus,
    Asterisk,
    AsteriskAsterisk,
    Slash,
    Percent,

    // Comparison
    LessThan,
    GreaterThan,
    LessThanEquals,
    GreaterThanEquals,
    EqualsEquals,
    ExclamationEquals,
    EqualsEqualsEquals,
    ExclamationEqualsEquals,
    InstanceOf,
    In,

    // Logical
    AmpersandAmpersand,
    BarBar,
    QuestionQuestion,

    // Bitwise
    Ampersand,
    Bar,
    Caret,
    LessThanLessThan,
    GreaterThanGreaterThan,
    GreaterThanGreaterThanGreaterThan,

    Comma,

    // Assignment
    Equals,
    PlusEquals,
    MinusEquals,
    AsteriskEquals,
    AsteriskAsteriskEquals,
    SlashEquals,
    PercentEquals,
    LessThanLessThanEquals,
    GreaterThanGreaterThanEquals,
    GreaterThanGreaterThanGreaterThanEquals,
    AmpersandEquals,
    BarEquals,
    CaretEquals,
    AmpersandAmpersandEquals,
    BarBarEquals,
    QuestionQuestionEquals,
}

const BINARY_TOKENS: &[(BinaryOperator, &str)] = &[
    (BinaryOperator::Plus, "+"),
    (BinaryOperator::Minus, "-"),
    (BinaryOperator::Asterisk, "*"),
    (BinaryOperator::AsteriskAsterisk, "**"),
    (BinaryOperator::Slash, "/"),
    (BinaryOperator::Percent, "%"),
    (BinaryOperator::LessThan, "<"),
    (BinaryOperator::GreaterThan, ">"),
    (BinaryOperator::LessThanEquals, "<="),
    (BinaryOperator::GreaterThanEquals, ">="),
    (BinaryOperator::EqualsEquals, "=="),
    (BinaryOperator::ExclamationEquals, "!="),
    (BinaryOperator::EqualsEqualsEquals, "==="),
    (BinaryOperator::ExclamationEqualsEquals, "!=="),
    (BinaryOperator::InstanceOf, "instanceof"),
    (BinaryOperator::In, "in"),
    (BinaryOperator::AmpersandAmpersand, "&&"),
    (BinaryOperator::BarBar, "||"),
    (BinaryOperator::QuestionQuestion, "??"),
    (BinaryOperator::Ampersand, "&"),
    (BinaryOperator::Bar, "|"),
    (BinaryOperator::Caret, "^"),
    (BinaryOperator::LessThanLessThan, "<<"),
    (BinaryOperator::GreaterThanGreaterThan, ">>"),
    (BinaryOperator::GreaterThanGreaterThanGreaterThan, ">>>"),
    (BinaryOperator::Comma, ","),
    (BinaryOperator::Equals, "="),
    (BinaryOperator::PlusEquals, "+="),
    (BinaryOperator::MinusEquals, "-="),
    (BinaryOperator::AsteriskEquals, "*="),
    (BinaryOperator::AsteriskAsteriskEquals, "**="),
    (BinaryOperator::SlashEquals, "/="),
    (BinaryOperator::PercentEquals, "%="),
    (BinaryOperator::LessThanLessThanEquals, "<<="),
    (BinaryOperator::GreaterThanGreaterThanEquals, ">>="),
    (BinaryOperator::GreaterThanGreaterThanGreaterThanEquals, ">>>="),
    (BinaryOperator::AmpersandEquals, "&="),
    (BinaryOperator::BarEquals, "|="),
    (BinaryOperator::CaretEquals, "^="),
    (BinaryOperator::AmpersandAmpersandEquals, "&&="),
    (BinaryOperator::BarBarEquals, "||="),
    (BinaryOperator::QuestionQuestionEquals, "??="),
];

impl BinaryOperator {
    pub fn from_token(token: &str) -> Option<Self> {
        BINARY_TOKENS
            .iter()
            .find(|(_, text)| *text == token)
            .map(|(op, _)| *op)
    }

    pub fn as_str(self) -> &'static str {
        BINARY_TOKENS
            .iter()
            .find(|(op, _)| *op == self)
            .map(|(_, text)| *text)
            .unwrap_or_default()
    }
}

/// Prefix unary operators. `typeof`, `void` and `delete` have their own node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOperator {
    Plus,
    Minus,
    Tilde,
    Exclamation,
    PlusPlus,
    MinusMinus,
}

impl PrefixOperator {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "+" => Some(Self::Plus),
            "-" => Some(Self::Minus),
            "~" => Some(Self::Tilde),
            "!" => Some(Self::Exclamation),
            "++" => Some(Self::PlusPlus),
            "--" => Some(Self::MinusMinus),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Tilde => "~",
            Self::Exclamation => "!",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOperator {
    PlusPlus,
    MinusMinus,
}

impl PostfixOperator {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "++" => Some(Self::PlusPlus),
            "--" => Some(Self::MinusMinus),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_binary_token_round_trips() {
        for (op, text) in BINARY_TOKENS {
            assert_eq!(BinaryOperator::from_token(text), Some(*op));
            assert_eq!(op.as_str(), *text);
        }
    }

    #[test]
    fn test_unknown_tokens() {
        assert_eq!(BinaryOperator::from_token("=>"), None);
        assert_eq!(PrefixOperator::from_token("typeof"), None);
        assert_eq!(PostfixOperator::from_token("!"), None);
    }
}

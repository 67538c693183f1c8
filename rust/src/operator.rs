use ahash::AHashMap;
use lazy_static::lazy_static;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum OperatorName {
    Addition,
    Assignment,
    AssignmentAddition,
    AssignmentBitwiseAnd,
    AssignmentBitwiseLeftShift,
    AssignmentBitwiseOr,
    AssignmentBitwiseRightShift,
    AssignmentBitwiseUnsignedRightShift,
    AssignmentBitwiseXor,
    AssignmentDivision,
    AssignmentMultiplication,
    AssignmentRemainder,
    AssignmentSubtraction,
    BitwiseAnd,
    BitwiseLeftShift,
    BitwiseNot,
    BitwiseOr,
    BitwiseRightShift,
    BitwiseUnsignedRightShift,
    BitwiseXor,
    Call,
    Comma,
    ComputedMemberAccess,
    Conditional,
    Delete,
    Division,
    Equality,
    GreaterThan,
    GreaterThanOrEqual,
    In,
    Inequality,
    Instanceof,
    LessThan,
    LessThanOrEqual,
    LogicalAnd,
    LogicalNot,
    LogicalOr,
    MemberAccess,
    Multiplication,
    New,
    PostfixDecrement,
    PostfixIncrement,
    PrefixDecrement,
    PrefixIncrement,
    Remainder,
    StrictEquality,
    StrictInequality,
    Subtraction,
    Typeof,
    UnaryNegation,
    UnaryPlus,
    Void,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

pub struct Operator {
    pub name: OperatorName,
    pub associativity: Associativity,
    pub precedence: u8,
}

// Skeleton of the operator tree, in ascending order of precedence. The
// useful representation is the `OPERATORS` map derived from this table;
// precedence values count down from the tightest-binding level, so a higher
// number always means tighter binding.
const PRECEDENCE_LEVELS: &[&[(OperatorName, Associativity)]] = &[
    &[(OperatorName::Comma, Associativity::Left)],
    &[
        (OperatorName::Assignment, Associativity::Right),
        (OperatorName::AssignmentAddition, Associativity::Right),
        (OperatorName::AssignmentBitwiseAnd, Associativity::Right),
        (
            OperatorName::AssignmentBitwiseLeftShift,
            Associativity::Right,
        ),
        (OperatorName::AssignmentBitwiseOr, Associativity::Right),
        (
            OperatorName::AssignmentBitwiseRightShift,
            Associativity::Right,
        ),
        (
            OperatorName::AssignmentBitwiseUnsignedRightShift,
            Associativity::Right,
        ),
        (OperatorName::AssignmentBitwiseXor, Associativity::Right),
        (OperatorName::AssignmentDivision, Associativity::Right),
        (OperatorName::AssignmentMultiplication, Associativity::Right),
        (OperatorName::AssignmentRemainder, Associativity::Right),
        (OperatorName::AssignmentSubtraction, Associativity::Right),
    ],
    &[(OperatorName::Conditional, Associativity::Right)],
    &[(OperatorName::LogicalOr, Associativity::Left)],
    &[(OperatorName::LogicalAnd, Associativity::Left)],
    &[(OperatorName::BitwiseOr, Associativity::Left)],
    &[(OperatorName::BitwiseXor, Associativity::Left)],
    &[(OperatorName::BitwiseAnd, Associativity::Left)],
    &[
        (OperatorName::Equality, Associativity::Left),
        (OperatorName::Inequality, Associativity::Left),
        (OperatorName::StrictEquality, Associativity::Left),
        (OperatorName::StrictInequality, Associativity::Left),
    ],
    &[
        (OperatorName::LessThan, Associativity::Left),
        (OperatorName::LessThanOrEqual, Associativity::Left),
        (OperatorName::GreaterThan, Associativity::Left),
        (OperatorName::GreaterThanOrEqual, Associativity::Left),
        (OperatorName::In, Associativity::Left),
        (OperatorName::Instanceof, Associativity::Left),
    ],
    &[
        (OperatorName::BitwiseLeftShift, Associativity::Left),
        (OperatorName::BitwiseRightShift, Associativity::Left),
        (OperatorName::BitwiseUnsignedRightShift, Associativity::Left),
    ],
    &[
        (OperatorName::Addition, Associativity::Left),
        (OperatorName::Subtraction, Associativity::Left),
    ],
    &[
        (OperatorName::Multiplication, Associativity::Left),
        (OperatorName::Division, Associativity::Left),
        (OperatorName::Remainder, Associativity::Left),
    ],
    &[
        (OperatorName::BitwiseNot, Associativity::Right),
        (OperatorName::Delete, Associativity::Right),
        (OperatorName::LogicalNot, Associativity::Right),
        (OperatorName::PrefixDecrement, Associativity::Right),
        (OperatorName::PrefixIncrement, Associativity::Right),
        (OperatorName::Typeof, Associativity::Right),
        (OperatorName::UnaryNegation, Associativity::Right),
        (OperatorName::UnaryPlus, Associativity::Right),
        (OperatorName::Void, Associativity::Right),
    ],
    &[
        (OperatorName::PostfixDecrement, Associativity::Left),
        (OperatorName::PostfixIncrement, Associativity::Left),
    ],
    &[
        (OperatorName::Call, Associativity::Left),
        (OperatorName::ComputedMemberAccess, Associativity::Left),
        (OperatorName::MemberAccess, Associativity::Left),
        (OperatorName::New, Associativity::Right),
    ],
];

lazy_static! {
    pub static ref OPERATORS: AHashMap<OperatorName, Operator> = {
        let mut map = AHashMap::<OperatorName, Operator>::new();
        for (level, ops) in PRECEDENCE_LEVELS.iter().enumerate() {
            for &(name, associativity) in ops.iter() {
                let precedence = (level + 1) as u8;
                map.insert(name, Operator {
                    name,
                    associativity,
                    precedence,
                });
            }
        }
        map
    };
}

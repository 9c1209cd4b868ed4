mod ops;

pub use ops::{BinOp, LogicalOp, OpError, UnaryOp};

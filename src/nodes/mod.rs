//! Built-in node implementations
//!
//! A small palette exercising the node contract: value sources, a summing
//! combinator and a JSON display sink. Hosts typically define their own
//! classes alongside these.

pub mod float_source;
pub mod print;
pub mod sum;
pub mod text_source;

pub use float_source::FloatSourceNode;
pub use print::PrintNode;
pub use sum::SumNode;
pub use text_source::TextSourceNode;

/// Activation record pushed by `Call` and popped by `Return`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    pub name: &'a str,
    /// Index of the instruction after the `Call`.
    pub ret_pc: usize,
    pub saved_bp: usize,
}

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// The byte position of the start of the token.
    pub start: u32,
    /// The length of the token in bytes.
    pub length: u32,
}

impl Span {
    pub const fn new(start: usize, length: usize) -> Self {
        Self {
            start: start as u32,
            length: length as u32,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }

    pub fn end(&self) -> u32 {
        self.start + self.length
    }
}

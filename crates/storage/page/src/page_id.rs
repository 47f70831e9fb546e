use std::fmt;

/// A simple type to define the unique FileId, which is at its core just a u32
pub type FileId = u32;

/// A unique identifier for a page within the buffer manager's cache, spanning
/// every file the process has open. Distinct from `BlockId`, which addresses a
/// block within a single relation's heap file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId {
    /// Unique identifier of the file containing the page.
    pub file_id: FileId,

    /// The specific page number within the file.
    pub page_number: u32,
}

impl PageId {
    /// Creates a new `PageId` instance with the given file ID and page number.
    pub fn new(file_id: u32, page_number: u32) -> Self {
        Self {
            file_id,
            page_number,
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file_id, self.page_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_correctly() {
        let page_id = PageId::new(123, 456);
        assert_eq!(page_id.to_string(), "123:456");
    }
}

//! File classification by magic number.
//!
//! Only files whose first four bytes are the ELF magic are candidates for
//! signature scanning. Classification is deliberately infallible: a file
//! that cannot be opened, is shorter than the magic, or starts with other
//! bytes is simply "not ELF" — never an error the caller has to report.

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A four-byte file magic, checked against the start of a file.
///
/// Carried as an explicit value (rather than a free constant) so tests and
/// embedders can classify against arbitrary magics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMagic([u8; 4]);

impl FileMagic {
    /// The ELF magic: `0x7F 'E' 'L' 'F'`.
    pub const ELF: FileMagic = FileMagic([0x7F, b'E', b'L', b'F']);

    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn bytes(&self) -> [u8; 4] {
        self.0
    }

    /// Check whether the file at `path` starts with this magic.
    ///
    /// Returns `true` only when exactly four bytes could be read and all
    /// four match. Open failures and short files yield `false`.
    pub fn matches_file(&self, path: &Path) -> bool {
        let mut file = match File::open(path) {
            Ok(f) => f,
            Err(_) => return false,
        };

        let mut header = [0u8; 4];
        match file.read_exact(&mut header) {
            Ok(()) => header == self.0,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(content).unwrap();
        path
    }

    #[test]
    fn elf_header_matches() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(&tmp, "bin", &[0x7F, b'E', b'L', b'F', 0, 0, 0, 0]);
        assert!(FileMagic::ELF.matches_file(&path));
    }

    #[test]
    fn exactly_four_magic_bytes_match() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(&tmp, "bin", &[0x7F, b'E', b'L', b'F']);
        assert!(FileMagic::ELF.matches_file(&path));
    }

    #[test]
    fn short_file_does_not_match() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(&tmp, "short", &[0x7F, b'E', b'L']);
        assert!(!FileMagic::ELF.matches_file(&path));
    }

    #[test]
    fn empty_file_does_not_match() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(&tmp, "empty", &[]);
        assert!(!FileMagic::ELF.matches_file(&path));
    }

    #[test]
    fn wrong_bytes_do_not_match() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(&tmp, "text", b"NOT_ELF\n");
        assert!(!FileMagic::ELF.matches_file(&path));
    }

    #[test]
    fn missing_file_does_not_match() {
        let tmp = TempDir::new().unwrap();
        assert!(!FileMagic::ELF.matches_file(&tmp.path().join("nope")));
    }

    #[test]
    fn custom_magic_is_honoured() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(&tmp, "png", &[0x89, b'P', b'N', b'G', 0x0D]);
        let png = FileMagic::new([0x89, b'P', b'N', b'G']);
        assert!(png.matches_file(&path));
        assert!(!FileMagic::ELF.matches_file(&path));
    }
}

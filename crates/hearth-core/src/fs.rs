// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Whole-file reads into tagged blocks.

use crate::memory::tagged::{self, RawBlock};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Reads an entire file into a freshly allocated tagged block.
///
/// The block's payload length equals the file size at the time of the
/// `metadata` call; the block accounts for itself in the memory counters
/// like any other tagged allocation.
pub fn read_file(path: &Path) -> io::Result<RawBlock> {
    let mut file = File::open(path)?;
    let size = file.metadata()?.len() as usize;

    let mut block = tagged::allocate(size);
    file.read_exact(block.as_mut_slice())?;
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("hearth-fs-{}-{name}", std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn reads_the_whole_file() {
        let path = temp_file("whole.txt", b"line one\nline two\n");
        let block = read_file(&path).unwrap();
        assert_eq!(block.as_slice(), b"line one\nline two\n");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn empty_file_reads_as_empty_block() {
        let path = temp_file("empty.txt", b"");
        let block = read_file(&path).unwrap();
        assert!(block.is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("hearth-fs-{}-missing", std::process::id()));
        assert!(read_file(&path).is_err());
    }
}

//! Plain-text rendering of a scanned image tree.

use std::fmt::Display;
use std::io::{self, Write};

use imgdir_core::{DirectoryEntry, EntryRef, ImageDirectory};

/// Width the field labels are padded to.
const LABEL_WIDTH: usize = 12;

/// Write `root` and every entry below it, depth-first, root first.
pub fn write_tree<W: Write>(out: &mut W, root: &ImageDirectory) -> io::Result<()> {
    write_entry(out, EntryRef::Directory(root))
}

/// Write one stanza for `entry`, followed by the stanzas of its children.
pub fn write_entry<W: Write>(out: &mut W, entry: EntryRef<'_>) -> io::Result<()> {
    writeln!(
        out,
        "name: {}, type: {}",
        entry.path().display(),
        entry.entry_type()
    )?;
    write_field(out, "filesize:", entry.file_size())?;
    write_field(
        out,
        "dimensions:",
        format_args!("{}x{}", entry.width(), entry.height()),
    )?;
    write_field(
        out,
        "compression:",
        format_args!("{}%", percent(entry.compression_factor())),
    )?;
    writeln!(out)?;

    if let EntryRef::Directory(dir) = entry {
        for child in dir.child_entries() {
            write_entry(out, child)?;
        }
    }
    Ok(())
}

fn write_field<W: Write>(out: &mut W, label: &str, value: impl Display) -> io::Result<()> {
    writeln!(out, "  {label:<width$} {value}", width = LABEL_WIDTH)
}

/// Compression factor as a whole percentage, truncated toward zero.
fn percent(factor: f64) -> i64 {
    (factor * 100.0) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgdir_core::{ImageFile, ImageFormat};

    fn render(root: &ImageDirectory) -> String {
        let mut out = Vec::new();
        write_tree(&mut out, root).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_root_stanza() {
        let text = render(&ImageDirectory::empty("/srv/empty"));
        assert_eq!(
            text,
            "name: /srv/empty, type: directory\n\
             \x20 filesize:    0\n\
             \x20 dimensions:  0x0\n\
             \x20 compression: 0%\n\
             \n"
        );
    }

    #[test]
    fn test_depth_first_order() {
        let sub = ImageDirectory::new(
            "/p/sub",
            Vec::new(),
            vec![ImageFile::new("/p/sub/test.jpg", ImageFormat::Jpeg, 100, 100, 630)],
        );
        let root = ImageDirectory::new(
            "/p",
            vec![sub],
            vec![ImageFile::new("/p/logo.gif", ImageFormat::Gif, 10, 10, 150)],
        );

        let text = render(&root);
        let names: Vec<&str> = text.lines().filter(|l| l.starts_with("name: ")).collect();
        assert_eq!(
            names,
            vec![
                "name: /p, type: directory",
                "name: /p/sub, type: directory",
                "name: /p/sub/test.jpg, type: JPEG-image",
                "name: /p/logo.gif, type: GIF-image",
            ]
        );
        assert!(text.contains("  compression: 2%\n"));
        assert!(text.contains("  compression: 150%\n"));
        assert!(text.contains("  dimensions:  55x55\n"));
        assert!(text.contains("  filesize:    780\n"));
    }

    #[test]
    fn test_percent_truncates() {
        assert_eq!(percent(0.021), 2);
        assert_eq!(percent(0.999), 99);
        assert_eq!(percent(1.5), 150);
        assert_eq!(percent(0.0), 0);
    }
}

//! Reading archive listings for the CLI
//!
//! Installers work on flat relative path lists. These come from a text file
//! (one entry per line), a zip archive, or a directory the archive was
//! already extracted to. Directories are listed with a trailing '/'.

use std::error::Error;
use std::fs::{self, File};
use std::path::Path;

use walkdir::WalkDir;

use modplan::logging::log_info;

pub fn read_listing(source: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let files = if source.is_dir() {
        list_directory(source)?
    } else if source
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
    {
        list_zip(source)?
    } else {
        list_file(source)?
    };

    log_info(&format!("Read {} entries from {:?}", files.len(), source));
    Ok(files)
}

fn list_file(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

fn list_zip(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    let mut files = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        files.push(entry.name().to_string());
    }
    Ok(files)
}

fn list_directory(root: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let relative = entry.path().strip_prefix(root)?;
        let mut name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if entry.file_type().is_dir() {
            name.push('/');
        }
        files.push(name);
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    #[test]
    fn test_list_file_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("files.txt");
        fs::write(&path, "mods/MyMod/\r\nmods/MyMod/data.pak\n\nreadme.txt\n").unwrap();

        assert_eq!(
            read_listing(&path).unwrap(),
            vec!["mods/MyMod/", "mods/MyMod/data.pak", "readme.txt"]
        );
    }

    #[test]
    fn test_list_directory_marks_folders() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("Valley")).unwrap();
        fs::write(dir.path().join("Valley").join("map.scn.xml"), "<scene/>").unwrap();
        fs::write(dir.path().join("readme.txt"), "hi").unwrap();

        assert_eq!(
            read_listing(dir.path()).unwrap(),
            vec!["Valley/", "Valley/map.scn.xml", "readme.txt"]
        );
    }

    #[test]
    fn test_list_zip_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mod.zip");
        let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
        writer
            .add_directory("packed/", SimpleFileOptions::default())
            .unwrap();
        writer
            .start_file("packed/m_9_Patch.pak", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"pak").unwrap();
        writer.finish().unwrap();

        assert_eq!(
            read_listing(&path).unwrap(),
            vec!["packed/", "packed/m_9_Patch.pak"]
        );
    }
}


use simple_error::bail;
use std::io::{BufWriter, Write};
use std::fs::File;
use std::path::Path;

/// Loads a JSON file into any deserializable type, gzip-decoded when the path ends in `.gz`
/// # Arguments
/// * `filename` - the file path to open and parse
/// # Errors
/// * if the file cannot be opened
/// * if the content does not deserialize into `T`
pub fn load_json<T: serde::de::DeserializeOwned>(filename: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let fp: Box<dyn std::io::Read> = if filename.extension().unwrap_or_default() == "gz" {
        Box::new(
            flate2::read::MultiGzDecoder::new(
                File::open(filename)?
            )
        )
    } else {
        Box::new(File::open(filename)?)
    };
    let result: T = serde_json::from_reader(fp)?;
    Ok(result)
}

/// Saves any serializable value as pretty JSON, gzip-compressed when the path ends in `.gz`
/// # Arguments
/// * `data` - the value to write
/// * `out_filename` - the path to write to
/// # Errors
/// * if the file cannot be created or written
/// * if serialization fails
pub fn save_json<T: serde::Serialize>(data: &T, out_filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file: Box<dyn std::io::Write> = if out_filename.extension().unwrap_or_default() == "gz" {
        Box::new(
            flate2::write::GzEncoder::new(
                File::create(out_filename)?,
                flate2::Compression::best()
            )
        )
    } else {
        Box::new(File::create(out_filename)?)
    };
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.flush()?;
    Ok(())
}

/// Builds the `.fai` index next to a FASTA file through htslib.
/// # Errors
/// * if the path is not a valid C string
/// * if htslib fails to read the FASTA or write the index
pub fn index_fasta(filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let os_path = std::ffi::CString::new(filename.display().to_string())?;
    let rc = unsafe { rust_htslib::htslib::fai_build(os_path.as_ptr()) };
    if rc < 0 {
        bail!("Error {rc} while building index for {filename:?}");
    }
    Ok(())
}

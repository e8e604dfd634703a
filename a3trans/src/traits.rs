//! The document trait shared by the stringtable and XLIFF codecs.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

use encoding_rs_io::DecodeReaderBytesBuilder;

use crate::error::Error;

/// One catalog document that is read from and written to one file.
///
/// Input is decoded BOM-aware: UTF-16 stringtables saved by Windows editors
/// are transcoded to UTF-8 before parsing, a UTF-8 BOM is dropped. Output is
/// always UTF-8 without BOM.
///
/// ```rust,no_run
/// use a3trans::{Parser, StringtableFormat};
/// let table = StringtableFormat::read_from("stringtable.xml")?;
/// println!("{}", table.project.name());
/// # Ok::<(), a3trans::Error>(())
/// ```
pub trait Parser: Sized {
    /// Parses a UTF-8 document.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>;

    /// Serializes the document as UTF-8.
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Parses raw bytes of any supported encoding.
    fn from_decoded<R: Read>(input: R) -> Result<Self, Error> {
        let decoder = DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(input);
        Self::from_reader(BufReader::new(decoder))
    }

    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        tracing::debug!("reading {}", path.display());
        Self::from_decoded(File::open(path)?)
    }

    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::from_reader(s.as_bytes())
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_decoded(bytes)
    }

    fn to_xml_string(&self) -> Result<String, Error> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        String::from_utf8(out).map_err(|e| Error::malformed(e.to_string()))
    }
}

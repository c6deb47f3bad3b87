//! Appendable array store
//!
//! An [`AppendableArray`] is one session on one `.npy` file. Opening reads
//! the header from disk; each append writes the new rows after the declared
//! payload and then rewrites the shape in place. Earlier payload bytes are
//! never rewritten, so an append costs the same regardless of file size.

use crate::array::ArrayView;
use crate::config::StoreConfig;
use crate::element::Element;
use crate::validate::{Established, validate};
use crate::{Result, StoreError};
use appendnpy_format::{DType, Header, StoredHeader};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Open file handle and the header currently on disk
#[derive(Debug)]
struct OpenFile {
    file: File,
    stored: StoredHeader,
    established: Established,
}

/// An `.npy` file opened for appending rows along the leading axis
///
/// The file is created lazily: opening a path that does not exist writes
/// nothing until the first append. Call [`AppendableArray::close`] to
/// observe errors from the final flush; dropping the store flushes on a
/// best-effort basis.
///
/// ```rust,no_run
/// use appendnpy_store::{AppendableArray, ArrayView};
///
/// # fn main() -> appendnpy_store::Result<()> {
/// let mut store = AppendableArray::open("forces.npy")?;
/// let rows = [0.5f64, 1.0, 1.5, 2.0, 2.5, 3.0];
/// store.append(&ArrayView::new(vec![2, 3], &rows)?)?;
/// store.append(&ArrayView::new(vec![2, 3], &rows)?)?;
/// assert_eq!(store.shape(), Some(&[4, 3][..]));
/// store.close()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AppendableArray {
    path: PathBuf,
    config: StoreConfig,
    open: Option<OpenFile>,
}

impl AppendableArray {
    /// Open `path` with the default configuration
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Format`] if the file exists but is not a
    /// readable `.npy` file, or [`StoreError::Io`] if it cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, StoreConfig::default())
    }

    /// Open `path` with an explicit configuration
    ///
    /// A missing or zero-length file is treated as pending creation. An
    /// existing file is opened for reading and writing without truncation
    /// and its header is decoded. Header slack is not checked here; a file
    /// that cannot grow is only refused when something is appended to it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Format`] if the file exists but is not a
    /// readable `.npy` file, or [`StoreError::Io`] if it cannot be opened.
    pub fn open_with_config(path: impl AsRef<Path>, config: StoreConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let existing = match fs::metadata(&path) {
            Ok(meta) => meta.len() > 0,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        if !existing {
            debug!("{} is pending creation", path.display());
            return Ok(Self {
                path,
                config,
                open: None,
            });
        }

        let mut file = OpenOptions::new().read(true).write(true).open(&path)?;
        let stored = StoredHeader::read_from(&mut file)?;
        debug!(
            "Opened {} with descr {} shape {:?} (header length {}, version {:?})",
            path.display(),
            stored.header.dtype,
            stored.header.shape,
            stored.header_length,
            stored.version
        );

        let established = Established::from_header(&stored.header);
        Ok(Self {
            path,
            config,
            open: Some(OpenFile {
                file,
                stored,
                established,
            }),
        })
    }

    /// Append a typed array along the leading axis
    ///
    /// # Errors
    ///
    /// See [`AppendableArray::append_raw`].
    pub fn append<T: Element>(&mut self, array: &ArrayView<'_, T>) -> Result<()> {
        self.append_raw(T::dtype(), array.shape(), &array.to_bytes())
    }

    /// Append native payload bytes described by `dtype` and `shape`
    ///
    /// The first append to a new file writes a header with room for any
    /// 64-bit row count, followed by the payload. Later appends write the
    /// payload after the declared end and rewrite the shape in place.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ZeroDimensional`] if `shape` is empty
    /// - [`StoreError::InvalidArray`] if `payload` does not match `shape`
    /// - [`StoreError::DtypeMismatch`] if `dtype` differs from the file's
    /// - [`StoreError::ShapeMismatch`] if the trailing dimensions differ
    /// - [`StoreError::InsufficientHeaderSlack`] if the file was not laid out
    ///   for growth; nothing is written in that case
    /// - [`StoreError::Io`] on write failure
    pub fn append_raw(&mut self, dtype: DType, shape: &[u64], payload: &[u8]) -> Result<()> {
        let incoming = Header::new(dtype, shape.to_vec());
        let expected = incoming
            .payload_size()
            .map_err(|e| StoreError::InvalidArray(e.to_string()))?;
        if expected != payload.len() as u64 {
            return Err(StoreError::InvalidArray(format!(
                "{dtype} array of shape {shape:?} needs {expected} bytes, got {}",
                payload.len()
            )));
        }

        match self.open.as_mut() {
            None => self.create(incoming, payload),
            Some(open) => Self::extend(open, self.config, &incoming, payload),
        }
    }

    /// First write: lay out the header with growth slack, then the payload
    fn create(&mut self, incoming: Header, payload: &[u8]) -> Result<()> {
        let established = validate(None, incoming.dtype, &incoming.shape)?;
        let stored = StoredHeader::create(incoming)?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        stored.write_to(&mut file)?;
        file.write_all(payload)?;
        persist(&mut file, self.config)?;

        info!(
            "Created {} with descr {} shape {:?} (header length {})",
            self.path.display(),
            stored.header.dtype,
            stored.header.shape,
            stored.header_length
        );
        self.open = Some(OpenFile {
            file,
            stored,
            established,
        });
        Ok(())
    }

    fn extend(
        open: &mut OpenFile,
        config: StoreConfig,
        incoming: &Header,
        payload: &[u8],
    ) -> Result<()> {
        let current = &open.stored.header;
        if current.fortran_order {
            return Err(StoreError::FortranOrder);
        }
        let Some(rows) = current.leading_dim() else {
            return Err(StoreError::ZeroDimensional);
        };
        open.established = validate(Some(&open.established), incoming.dtype, &incoming.shape)?;

        if !open.stored.can_grow() {
            let required = current.with_leading_dim(u64::MAX).encoded_len();
            warn!(
                "Refusing to append: header region of {} bytes needs {} to grow",
                open.stored.header_length, required
            );
            return Err(StoreError::InsufficientHeaderSlack {
                header_length: open.stored.header_length,
                required,
            });
        }

        let added = incoming.leading_dim().unwrap_or(0);
        let total = rows
            .checked_add(added)
            .ok_or(StoreError::RowCountOverflow {
                current: rows,
                incoming: added,
            })?;
        let grown = current.with_leading_dim(total);
        if grown.payload_size().is_err() {
            return Err(StoreError::RowCountOverflow {
                current: rows,
                incoming: added,
            });
        }

        let end = open.stored.payload_end()?;
        open.file.seek(SeekFrom::Start(end))?;
        open.file.write_all(payload)?;
        // Drop any bytes a previously interrupted append left past the end
        open.file.set_len(end + payload.len() as u64)?;

        open.stored
            .rewrite_shape_in_place(&mut open.file, grown.shape)?;
        persist(&mut open.file, config)?;

        debug!("Appended {} rows, shape is now {:?}", added, open.stored.header.shape);
        Ok(())
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Configuration this store was opened with
    pub const fn config(&self) -> StoreConfig {
        self.config
    }

    /// Whether the file has not been created yet
    pub const fn is_pending(&self) -> bool {
        self.open.is_none()
    }

    /// Header currently on disk, if the file exists
    pub fn header(&self) -> Option<&StoredHeader> {
        self.open.as_ref().map(|open| &open.stored)
    }

    /// Full shape currently on disk
    pub fn shape(&self) -> Option<&[u64]> {
        self.header().map(|stored| stored.header.shape.as_slice())
    }

    /// Element type currently on disk
    pub fn dtype(&self) -> Option<DType> {
        self.header().map(|stored| stored.header.dtype)
    }

    /// Flush and release the file handle
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the final flush or sync fails.
    pub fn close(mut self) -> Result<()> {
        if let Some(mut open) = self.open.take() {
            persist(&mut open.file, self.config)?;
            debug!("Closed {}", self.path.display());
        }
        Ok(())
    }
}

impl Drop for AppendableArray {
    fn drop(&mut self) {
        if let Some(open) = self.open.as_mut()
            && let Err(e) = open.file.flush()
        {
            warn!("Failed to flush {} on drop: {}", self.path.display(), e);
        }
    }
}

fn persist(file: &mut File, config: StoreConfig) -> io::Result<()> {
    file.flush()?;
    if config.sync_on_append {
        file.sync_data()?;
    }
    Ok(())
}

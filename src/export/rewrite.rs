use crate::error::ExportError;
use crate::export::config::PagingConfig;
use crate::export::ingest::{ChannelSummary, ingest_private_channels};
use crate::export::record::GROUPS_ENTRY;
use crate::slack::SlackTransport;
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::result::ZipError;
use zip::{ZipArchive, ZipWriter};

/// rw-r--r--, what a plain file create gives under the usual umask.
#[cfg(unix)]
const ARCHIVE_MODE: u32 = 0o644;

#[derive(Debug, Clone, Default)]
pub struct RewriteOutcome {
    pub copied_entries: usize,
    pub groups_present: bool,
    pub channels: Vec<ChannelSummary>,
}

/// Copy every entry of `input` into `writer` untouched, then add the
/// private channel entries unless `groups.json` was among the copied ones.
pub fn copy_and_augment<R, W, T>(
    input: &mut ZipArchive<R>,
    writer: &mut ZipWriter<W>,
    transport: &T,
    paging: &PagingConfig,
) -> Result<RewriteOutcome, ExportError>
where
    R: Read + Seek,
    W: Write + Seek,
    T: SlackTransport + ?Sized,
{
    let mut groups_present = false;

    for index in 0..input.len() {
        let entry = input
            .by_index_raw(index)
            .map_err(|source| ExportError::Copy {
                entry: format!("#{index}"),
                source,
            })?;
        let name = entry.name().to_string();
        tracing::info!(entry = %name, "processing file");

        if name == GROUPS_ENTRY {
            groups_present = true;
            tracing::info!("{GROUPS_ENTRY} is already present in the export, not fetching it again");
        }
        // Raw copy keeps the header and compressed bytes as they were.
        writer
            .raw_copy_file(entry)
            .map_err(|source| ExportError::Copy {
                entry: name,
                source,
            })?;
    }

    let channels = if groups_present {
        Vec::new()
    } else {
        ingest_private_channels(writer, transport, paging)?
    };

    Ok(RewriteOutcome {
        copied_entries: input.len(),
        groups_present,
        channels,
    })
}

fn staging_dir(output: &Path) -> &Path {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Refuse a destination that the final move could not replace, before
/// anything is fetched.
fn check_destination(output: &Path) -> io::Result<()> {
    let Ok(meta) = fs::metadata(output) else {
        return Ok(());
    };
    if meta.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::IsADirectory,
            "destination is a directory",
        ));
    }
    if meta.permissions().readonly() {
        return Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "destination file is read-only",
        ));
    }
    Ok(())
}

#[cfg(unix)]
fn publish_permissions(file: &File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(ARCHIVE_MODE))
}

#[cfg(not(unix))]
fn publish_permissions(_file: &File) -> io::Result<()> {
    Ok(())
}

/// Rewrite the export at `input` into `output`.
///
/// The new archive is staged next to `output` and only moved into place
/// once it has been finalized. A failure before that leaves nothing at
/// `output`; if the final move fails, the finished archive stays at its
/// staged path.
pub fn rewrite_archive<T>(
    input: &Path,
    output: &Path,
    transport: &T,
    paging: &PagingConfig,
) -> Result<RewriteOutcome, ExportError>
where
    T: SlackTransport + ?Sized,
{
    let open_failed = |source: ZipError| ExportError::ArchiveOpen {
        path: input.to_path_buf(),
        source,
    };
    let file = File::open(input).map_err(|err| open_failed(ZipError::Io(err)))?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(open_failed)?;

    let create_failed = |source: io::Error| ExportError::ArchiveCreate {
        path: output.to_path_buf(),
        source,
    };
    check_destination(output).map_err(create_failed)?;
    let staged = NamedTempFile::new_in(staging_dir(output)).map_err(create_failed)?;
    let mut writer = ZipWriter::new(staged);

    let outcome = copy_and_augment(&mut archive, &mut writer, transport, paging)?;

    let close_failed = |source: io::Error| ExportError::ArchiveClose {
        path: output.to_path_buf(),
        source,
    };
    let staged = writer
        .finish()
        .map_err(|err| close_failed(io::Error::other(err)))?;
    publish_permissions(staged.as_file()).map_err(close_failed)?;
    if let Err(err) = staged.persist(output) {
        if let Ok((_, kept)) = err.file.keep() {
            tracing::warn!(staged = %kept.display(), "finished archive left at its staged path");
        }
        return Err(close_failed(err.error));
    }

    Ok(outcome)
}

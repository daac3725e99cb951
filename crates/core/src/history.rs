//! Folding a room's chronological remarks into outgoing message batches.
//!
//! Consecutive photos that belong together are grouped into albums so the
//! chat shows one media group instead of a stream of single photos. A
//! photo joins the open run when it carries no caption or repeats the
//! run's caption verbatim; any text remark, a differing caption or the
//! album size limit closes the run. Order is strictly chronological.
//!
//! The fold emits display-ready output: texts and captions carry the
//! author prefix, raw captions are only used for grouping decisions.

/// Prefix applied to operator-authored text when it is played back.
pub const AUTHOR_PREFIX: &str = "👤 ";

/// Telegram albums carry at most ten photos.
pub const MAX_MEDIA_GROUP: usize = 10;

/// A remark as the fold sees it, already in chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    Text(String),
    Photo {
        file_id: String,
        caption: Option<String>,
    },
}

/// One outgoing message: a text or a photo album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Batch {
    Text(String),
    Photos {
        file_ids: Vec<String>,
        caption: Option<String>,
    },
}

struct PhotoRun {
    caption: Option<String>,
    file_ids: Vec<String>,
}

fn flush(open: &mut Option<PhotoRun>, batches: &mut Vec<Batch>) {
    if let Some(run) = open.take() {
        batches.push(Batch::Photos {
            file_ids: run.file_ids,
            caption: run.caption.map(|c| format!("{AUTHOR_PREFIX}{c}")),
        });
    }
}

/// Fold chronological entries into message batches.
pub fn fold_history<I>(entries: I) -> Vec<Batch>
where
    I: IntoIterator<Item = HistoryEntry>,
{
    let mut batches = Vec::new();
    let mut open: Option<PhotoRun> = None;

    for entry in entries {
        match entry {
            HistoryEntry::Text(text) => {
                flush(&mut open, &mut batches);
                batches.push(Batch::Text(format!("{AUTHOR_PREFIX}{text}")));
            }
            HistoryEntry::Photo { file_id, caption } => {
                if let Some(run) = open.as_mut() {
                    let joins = caption.is_none() || caption == run.caption;
                    if joins && run.file_ids.len() < MAX_MEDIA_GROUP {
                        run.file_ids.push(file_id);
                        continue;
                    }
                    flush(&mut open, &mut batches);
                }
                open = Some(PhotoRun {
                    caption,
                    file_ids: vec![file_id],
                });
            }
        }
    }
    flush(&mut open, &mut batches);
    batches
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

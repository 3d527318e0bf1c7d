use crate::Context;
use crate::error::{ErrorKind, Result};
use crate::tracker::WatchedItem;
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;

/// Progress events emitted by [`reconcile`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started): exactly once.
/// 2. [`Discovered`](Self::Discovered): zero or more times, one per arrival.
/// 3. [`DiscoveryComplete`](Self::DiscoveryComplete): exactly once, with the
///    number of arrivals.
/// 4. [`Complete`](Self::Complete): exactly once.
///
/// A failure to list the inbox ends the stream after [`Started`](Self::Started).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Started,
    Discovered(WatchedItem),
    DiscoveryComplete(u64),
    Complete,
}

/// Streams an arrival for each direct child of the inbox: every directory
/// (when folder mode is on) and every file with a supported extension, in
/// path order.
pub fn reconcile(ctx: &Context) -> impl Stream<Item = Result<ScanEvent>> + '_ {
    stream! {
        yield Ok(ScanEvent::Started);

        let mut entries = match ctx.backend.children(&ctx.inbox).await.or_raise(|| ErrorKind::Storage) {
            Ok(entries) => entries,
            Err(e) => {
                yield Err(e);
                return;
            },
        };
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        let mut discovered = 0u64;
        for entry in entries {
            match WatchedItem::from_entry(&entry.path, entry.is_dir(), ctx.folders.enabled) {
                Some(item) => {
                    tracing::info!(path = %item.path.display(), kind = %item.kind, "Found existing arrival");
                    discovered += 1;
                    yield Ok(ScanEvent::Discovered(item));
                },
                None => tracing::debug!(path = %entry.path.display(), "Ignoring inbox entry"),
            }
        }
        yield Ok(ScanEvent::DiscoveryComplete(discovered));
        yield Ok(ScanEvent::Complete);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FolderMode;
    use crate::tests::{Fixed, context, write};
    use crate::tracker::ItemKind;
    use futures::StreamExt;
    use std::path::PathBuf;

    async fn collect(ctx: &Context) -> Vec<ScanEvent> {
        reconcile(ctx).map(|event| event.unwrap()).collect().await
    }

    fn discovered(events: &[ScanEvent]) -> Vec<(PathBuf, ItemKind)> {
        events
            .iter()
            .filter_map(|event| match event {
                ScanEvent::Discovered(item) => Some((item.path.clone(), item.kind)),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_reconcile_direct_children() {
        let temp_dir = tempfile::tempdir().unwrap();
        let ctx = context(&temp_dir, Fixed::new(None));
        write(&ctx.inbox.join("Bundle/nested.epub"), 10);
        write(&ctx.inbox.join("book.epub"), 10);
        write(&ctx.inbox.join("notes.txt"), 10);
        write(&ctx.inbox.join("paper.PDF"), 10);

        let events = collect(&ctx).await;
        assert_eq!(events.first(), Some(&ScanEvent::Started));
        assert_eq!(events[events.len() - 2], ScanEvent::DiscoveryComplete(3));
        assert_eq!(events.last(), Some(&ScanEvent::Complete));
        assert_eq!(
            discovered(&events),
            vec![
                (ctx.inbox.join("Bundle"), ItemKind::Folder),
                (ctx.inbox.join("book.epub"), ItemKind::File),
                (ctx.inbox.join("paper.PDF"), ItemKind::File),
            ]
        );
    }

    #[tokio::test]
    async fn test_reconcile_without_folder_mode() {
        let temp_dir = tempfile::tempdir().unwrap();
        let ctx = context(&temp_dir, Fixed::new(None)).with_folders(FolderMode { enabled: false, fallback: true });
        write(&ctx.inbox.join("Bundle/nested.epub"), 10);
        write(&ctx.inbox.join("book.cbz"), 10);

        let events = collect(&ctx).await;
        assert_eq!(discovered(&events), vec![(ctx.inbox.join("book.cbz"), ItemKind::File)]);
    }

    #[tokio::test]
    async fn test_reconcile_missing_inbox() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&temp_dir, Fixed::new(None));
        ctx.inbox = temp_dir.path().join("missing");
        let events: Vec<_> = reconcile(&ctx).collect().await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Ok(ScanEvent::Started)));
        assert!(events[1].is_err());
    }
}

use crate::domain::{is_base_tag, is_semver_tag, BaseTagResolution, Semver, Tag};
use crate::error::{PrSemverError, Result};
use crate::observer::{ProgressEvent, ProgressObserver};
use crate::service::HostingService;

/// Walks tag history newest first to find the release to increment from
///
/// The walk stops at the first tag without a pre-release. Commits are only
/// fetched for the newest semver tag and for that base tag, which keeps the
/// number of requests low on repositories with long histories.
pub struct TagChainResolver<'a, S: HostingService + ?Sized> {
    service: &'a S,
    observer: &'a dyn ProgressObserver,
    page_size: u32,
}

impl<'a, S: HostingService + ?Sized> TagChainResolver<'a, S> {
    pub fn new(service: &'a S, observer: &'a dyn ProgressObserver, page_size: u32) -> Self {
        TagChainResolver {
            service,
            observer,
            page_size,
        }
    }

    pub fn resolve(&self) -> Result<BaseTagResolution> {
        let mut chain: Vec<Tag> = Vec::new();
        let mut start = 0;

        loop {
            let page = self.service.list_tags(start, self.page_size)?;
            self.observer.on_event(&ProgressEvent::TagPageFetched {
                start,
                count: page.values.len(),
                is_last_page: !page.has_more(),
            });

            for entry in &page.values {
                if !is_semver_tag(&entry.display_id) {
                    self.observer.on_event(&ProgressEvent::TagSkipped {
                        name: &entry.display_id,
                    });
                    continue;
                }

                let mut tag = Tag::new(&entry.display_id, &entry.latest_commit);
                tag.semver = Some(Semver::parse(&tag.display_name)?);

                let is_base = is_base_tag(&tag.display_name);
                if chain.is_empty() || is_base {
                    self.attach_commit(&mut tag)?;
                }

                if is_base {
                    let excluded_pull_request_id = tag.merged_pull_request_id();
                    self.observer.on_event(&ProgressEvent::BaseTagResolved {
                        name: &tag.display_name,
                        excluded_pull_request_id,
                    });
                    chain.push(tag.clone());
                    return Ok(BaseTagResolution {
                        base_tag: Some(tag),
                        chain,
                        excluded_pull_request_id,
                    });
                }

                chain.push(tag);
            }

            match page.next_page_start {
                Some(next) if page.has_more() => {
                    if next <= start {
                        return Err(PrSemverError::remote(format!(
                            "Tag listing did not advance past start {}",
                            start
                        )));
                    }
                    start = next;
                }
                _ => break,
            }
        }

        self.observer.on_event(&ProgressEvent::NoBaseTag {
            chain_length: chain.len(),
        });
        Ok(BaseTagResolution {
            base_tag: None,
            chain,
            excluded_pull_request_id: None,
        })
    }

    fn attach_commit(&self, tag: &mut Tag) -> Result<()> {
        let commit = self.service.get_commit(&tag.commit_hash)?;
        self.observer.on_event(&ProgressEvent::CommitFetched {
            tag: &tag.display_name,
            hash: &tag.commit_hash,
        });
        tag.commit_timestamp = commit.authored_at();
        tag.commit_message = commit.message;
        Ok(())
    }
}

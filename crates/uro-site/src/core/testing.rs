//! In-memory doubles for the core ports.

use crate::core::error::{SiteError, SiteResult};
use crate::core::nav::NavGroup;
use crate::core::ports::{Clock, FragmentSource, NavLink, Renderer, Transport};
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::future::{Future, ready};

#[derive(Clone, Debug, Default)]
pub(crate) struct FakeLink {
    pub(crate) href: Option<String>,
    pub(crate) classes: BTreeSet<String>,
}

/// Page double recording every DOM mutation.
#[derive(Debug, Default)]
pub(crate) struct FakePage {
    pub(crate) elements: RefCell<BTreeMap<String, String>>,
    pub(crate) root_class: RefCell<Option<String>>,
    pub(crate) links: RefCell<BTreeMap<NavGroup, Vec<FakeLink>>>,
    pub(crate) navigations: RefCell<Vec<String>>,
}

impl FakePage {
    pub(crate) fn with_element(self, id: &str, content: &str) -> Self {
        self.elements
            .borrow_mut()
            .insert(id.to_string(), content.to_string());
        self
    }

    pub(crate) fn with_links(self, group: NavGroup, hrefs: &[Option<&str>], classes: &[&str]) -> Self {
        let links = hrefs
            .iter()
            .map(|href| FakeLink {
                href: href.map(str::to_string),
                classes: classes.iter().map(|class| (*class).to_string()).collect(),
            })
            .collect();
        self.links.borrow_mut().insert(group, links);
        self
    }

    pub(crate) fn content(&self, id: &str) -> Option<String> {
        self.elements.borrow().get(id).cloned()
    }

    pub(crate) fn link_has(&self, group: NavGroup, index: usize, class: &str) -> bool {
        self.links
            .borrow()
            .get(&group)
            .and_then(|links| links.get(index))
            .is_some_and(|link| link.classes.contains(class))
    }

    pub(crate) fn marked(&self, group: NavGroup, class: &str) -> Vec<usize> {
        self.links
            .borrow()
            .get(&group)
            .map(|links| {
                links
                    .iter()
                    .enumerate()
                    .filter(|(_, link)| link.classes.contains(class))
                    .map(|(index, _)| index)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Renderer for FakePage {
    fn has_element(&self, id: &str) -> bool {
        self.elements.borrow().contains_key(id)
    }

    fn replace_content(&self, id: &str, markup: &str) -> SiteResult<()> {
        let mut elements = self.elements.borrow_mut();
        let slot = elements
            .get_mut(id)
            .ok_or_else(|| SiteError::MissingElement { id: id.to_string() })?;
        *slot = markup.to_string();
        Ok(())
    }

    fn set_root_class(&self, class: &str) {
        *self.root_class.borrow_mut() = Some(class.to_string());
    }

    fn nav_links(&self, group: NavGroup) -> Vec<NavLink> {
        self.links
            .borrow()
            .get(&group)
            .map(|links| {
                links
                    .iter()
                    .enumerate()
                    .map(|(index, link)| NavLink {
                        index,
                        href: link.href.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn update_link_classes(&self, group: NavGroup, index: usize, add: &[&str], remove: &[&str]) {
        if let Some(link) = self
            .links
            .borrow_mut()
            .get_mut(&group)
            .and_then(|links| links.get_mut(index))
        {
            for class in remove {
                link.classes.remove(*class);
            }
            for class in add {
                link.classes.insert((*class).to_string());
            }
        }
    }

    fn navigate(&self, url: &str) {
        self.navigations.borrow_mut().push(url.to_string());
    }
}

/// Transport double queueing dispatched payloads for manual delivery.
#[derive(Debug, Default)]
pub(crate) struct QueueTransport {
    pub(crate) dispatched: RefCell<Vec<String>>,
}

impl QueueTransport {
    pub(crate) fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.dispatched.borrow_mut())
    }
}

impl Transport for QueueTransport {
    fn dispatch(&self, raw: &str) -> SiteResult<()> {
        self.dispatched.borrow_mut().push(raw.to_string());
        Ok(())
    }
}

/// Clock frozen at a fixed instant.
#[derive(Debug)]
pub(crate) struct FixedClock(pub(crate) i64);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.0).unwrap_or_default()
    }
}

/// Fragment source answering from a fixed table; unknown paths fail at the
/// transport level.
#[derive(Debug, Default)]
pub(crate) struct ScriptedSource {
    pub(crate) responses: BTreeMap<String, Result<String, u16>>,
    pub(crate) requests: RefCell<Vec<String>>,
}

impl ScriptedSource {
    pub(crate) fn ok(mut self, path: &str, body: &str) -> Self {
        self.responses.insert(path.to_string(), Ok(body.to_string()));
        self
    }

    pub(crate) fn status(mut self, path: &str, status: u16) -> Self {
        self.responses.insert(path.to_string(), Err(status));
        self
    }
}

impl FragmentSource for ScriptedSource {
    fn fetch(&self, path: &str) -> impl Future<Output = SiteResult<String>> {
        self.requests.borrow_mut().push(path.to_string());
        let result = match self.responses.get(path) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(SiteError::FetchStatus {
                path: path.to_string(),
                status: *status,
            }),
            None => Err(SiteError::Network {
                path: path.to_string(),
                message: "connection refused".into(),
            }),
        };
        ready(result)
    }
}

//! `Classpath`: the lookup over (a) a read-only archive/directory of pre-compiled classes and
//! (b) classes compiled earlier in the same invocation (§4.4 of the governing specification).

use crate::class::ClassInfo;
use crate::entry::ClassPathEntry;
use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::{debug, trace};

#[derive(Debug, Default)]
pub struct Classpath {
    entries: Vec<ClassPathEntry>,
    /// Classes produced by this invocation's own compilation units; these always shadow the
    /// archive, matching two-phase (signatures-then-bodies) compilation across a cycle.
    in_process: HashMap<String, ClassInfo>,
    /// Memoizes archive reads; `javac` never mutates a class once registered, so the cache never
    /// needs invalidating for the lifetime of one driver invocation.
    cache: RefCell<HashMap<String, Option<ClassInfo>>>,
}

impl Classpath {
    #[must_use]
    pub fn new(roots: impl IntoIterator<Item = impl Into<std::path::PathBuf>>) -> Classpath {
        let entries = roots.into_iter().map(ClassPathEntry::new).collect();
        Classpath {
            entries,
            in_process: HashMap::new(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// A classpath with no archive entries, for `--no-rt` (§9 open question (b)): resolution
    /// proceeds against in-process classes only.
    #[must_use]
    pub fn empty() -> Classpath {
        Classpath::default()
    }

    /// Registers a class compiled earlier in this invocation, so later units see it without
    /// re-reading a `.class` file that may not exist on disk yet.
    pub fn register_in_process(&mut self, info: ClassInfo) {
        trace!(class = %info.internal_name, "registering in-process class");
        self.cache.borrow_mut().remove(&info.internal_name);
        self.in_process.insert(info.internal_name.clone(), info);
    }

    /// Looks up a class by internal (`/`-separated) name.
    pub fn find(&self, internal_name: &str) -> Result<Option<ClassInfo>> {
        if let Some(info) = self.in_process.get(internal_name) {
            return Ok(Some(info.clone()));
        }
        if let Some(cached) = self.cache.borrow().get(internal_name) {
            return Ok(cached.clone());
        }

        for entry in &self.entries {
            if let Some(class_file) = entry.read_class(internal_name)? {
                debug!(class = internal_name, "resolved class from classpath entry");
                let info = ClassInfo::from_class_file(&class_file)?;
                self.cache.borrow_mut().insert(internal_name.to_string(), Some(info.clone()));
                return Ok(Some(info));
            }
        }

        self.cache.borrow_mut().insert(internal_name.to_string(), None);
        Ok(None)
    }

    pub fn exists(&self, internal_name: &str) -> Result<bool> {
        Ok(self.find(internal_name)?.is_some())
    }

    pub fn require(&self, internal_name: &str) -> Result<ClassInfo> {
        self.find(internal_name)?.ok_or_else(|| Error::ClassNotFound(internal_name.to_string()))
    }

    /// Walks `start`'s superclass chain (not including `start` itself), stopping at
    /// `java/lang/Object` or when a superclass cannot be found.
    pub fn superclasses(&self, start: &str) -> Result<Vec<ClassInfo>> {
        let mut chain = Vec::new();
        let mut current = self.find(start)?;
        while let Some(info) = current {
            let Some(super_name) = info.super_name.clone() else {
                break;
            };
            let Some(super_info) = self.find(&super_name)? else {
                break;
            };
            chain.push(super_info.clone());
            current = Some(super_info);
        }
        Ok(chain)
    }
}

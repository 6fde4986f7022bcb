//! Forward-branch labels.
//!
//! `javac_classfile`'s `Instruction` branch variants (`Ifeq`, `Goto`, ...) already store their
//! target as an *instruction index* rather than a byte offset — `javac_classfile` itself converts
//! indices to byte offsets during serialization (see `attributes::offset_utils`). A label here is
//! just a promise to fill in that instruction index once the target location is known.

use crate::error::{Error, Result};

/// An opaque handle to a branch target, created with `MethodBuilder::new_label` and fixed in
/// place with `MethodBuilder::bind_label`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Label(pub(crate) usize);

#[derive(Debug, Default)]
pub(crate) struct LabelTable {
    targets: Vec<Option<u16>>,
}

impl LabelTable {
    pub(crate) fn new_label(&mut self) -> Label {
        self.targets.push(None);
        Label(self.targets.len() - 1)
    }

    pub(crate) fn bind(&mut self, label: Label, instruction_index: u16) -> Result<()> {
        let slot = self
            .targets
            .get_mut(label.0)
            .expect("label created by this table");
        if slot.is_some() {
            return Err(Error::LabelAlreadyBound(label));
        }
        *slot = Some(instruction_index);
        Ok(())
    }

    pub(crate) fn resolve(&self, label: Label) -> Result<u16> {
        self.targets[label.0].ok_or(Error::UnboundLabel(label))
    }
}

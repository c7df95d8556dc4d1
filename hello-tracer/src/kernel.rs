//! Seam between the program lifecycle and the kernel's BPF subsystem.
//!
//! Every stage of [`ProgramHandle`](crate::program::ProgramHandle) construction
//! and teardown goes through this trait, so the ordering rules can be checked
//! without a live kernel.

use std::path::Path;

use crate::{error::Result, resolver::EntryPoint};

pub trait Kernel {
    /// An object file read from disk, not yet known to the kernel.
    type Image;
    /// A loaded object: maps created, programs verified.
    type Object;
    type Map;
    type Link;

    fn open(&self, path: &Path) -> Result<Self::Image>;

    fn load(&self, path: &Path, image: Self::Image) -> Result<Self::Object>;

    fn has_program(&self, object: &Self::Object, name: &str) -> bool;

    /// Moves the named map out of `object`, or `None` if the object has no
    /// map by that exact name.
    fn take_map(&self, object: &mut Self::Object, name: &str) -> Option<Self::Map>;

    fn attach(&self, object: &mut Self::Object, entry_point: &EntryPoint) -> Result<Self::Link>;

    fn detach(&self, object: &mut Self::Object, link: Self::Link);

    fn unload(&self, object: &mut Self::Object, entry_point: &EntryPoint);

    fn close(&self, object: Self::Object);
}

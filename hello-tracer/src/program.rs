use std::path::Path;

use log::debug;

use crate::{
    attach::{self, AttachmentLink},
    config::TracerConfig,
    error::Result,
    kernel::Kernel,
    loader,
    resolver::{self, EntryPoint, MapBinding},
};

/// A loaded, resolved and fully attached object.
///
/// Only [`ProgramHandle::open_and_attach`] creates one, and it either returns
/// a handle with one link per entry point or releases everything it acquired
/// before returning the error.
pub struct ProgramHandle<K: Kernel> {
    kernel: K,
    name: String,
    object: K::Object,
    entry_points: Vec<EntryPoint>,
    maps: Vec<MapBinding<K::Map>>,
    links: Vec<AttachmentLink<K::Link>>,
}

impl<K: Kernel> ProgramHandle<K> {
    pub fn open_and_attach(kernel: K, path: &Path, config: &TracerConfig) -> Result<Self> {
        let object = loader::open_and_load(&kernel, path)?;
        let mut handle = Self {
            kernel,
            name: path.display().to_string(),
            object,
            entry_points: Vec::new(),
            maps: Vec::new(),
            links: Vec::new(),
        };

        match handle.resolve_and_attach(config) {
            Ok(()) => Ok(handle),
            Err(e) => {
                handle.teardown();
                Err(e)
            }
        }
    }

    fn resolve_and_attach(&mut self, config: &TracerConfig) -> Result<()> {
        self.entry_points =
            resolver::resolve_entry_points(&self.kernel, &self.object, &config.entry_points)?;
        self.maps = resolver::resolve_maps(&self.kernel, &mut self.object, &config.maps)?;
        attach::attach_all(
            &self.kernel,
            &mut self.object,
            &self.entry_points,
            &mut self.links,
        )
    }

    /// Detaches, releases and closes everything this handle owns.
    pub fn destroy(self) {
        let name = self.name.clone();
        self.teardown();
        debug!("destroyed {name}");
    }

    // Releases in reverse order of acquisition; only touches what exists.
    fn teardown(self) {
        let Self {
            kernel,
            mut object,
            entry_points,
            maps,
            mut links,
            ..
        } = self;

        attach::detach_all(&kernel, &mut object, &mut links);
        for entry_point in entry_points.iter().rev() {
            kernel.unload(&mut object, entry_point);
        }
        drop(maps);
        kernel.close(object);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry_points(&self) -> &[EntryPoint] {
        &self.entry_points
    }

    pub fn maps(&self) -> &[MapBinding<K::Map>] {
        &self.maps
    }

    pub fn links(&self) -> &[AttachmentLink<K::Link>] {
        &self.links
    }

    pub fn map(&self, name: &str) -> Option<&MapBinding<K::Map>> {
        resolver::find_map(&self.maps, name)
    }

    pub fn map_mut(&mut self, name: &str) -> Option<&mut MapBinding<K::Map>> {
        resolver::find_map_mut(&mut self.maps, name)
    }
}

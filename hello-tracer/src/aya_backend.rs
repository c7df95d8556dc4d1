use std::{fs, io, path::Path};

use aya::{
    Ebpf,
    maps::Map,
    programs::{Program, kprobe::KProbeLinkId},
};
use log::{debug, warn};

use crate::{
    error::{Error, Result},
    kernel::Kernel,
    resolver::EntryPoint,
};

const ELF_MAGIC: &[u8] = b"\x7fELF";

/// [`Kernel`] backed by the running kernel through `aya`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AyaKernel;

#[derive(Debug)]
pub struct AyaLink {
    program: String,
    id: KProbeLinkId,
}

impl Kernel for AyaKernel {
    type Image = Vec<u8>;
    type Object = Ebpf;
    type Map = Map;
    type Link = AyaLink;

    fn open(&self, path: &Path) -> Result<Vec<u8>> {
        let bytes = fs::read(path).map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })?;
        if !bytes.starts_with(ELF_MAGIC) {
            return Err(Error::Open {
                path: path.to_owned(),
                source: io::Error::new(io::ErrorKind::InvalidData, "not an ELF object"),
            });
        }
        Ok(bytes)
    }

    fn load(&self, path: &Path, image: Vec<u8>) -> Result<Ebpf> {
        let mut ebpf = Ebpf::load(&image).map_err(|e| Error::load(path, e))?;

        for (name, program) in ebpf.programs_mut() {
            match program {
                Program::KProbe(p) => p.load().map_err(|e| Error::load(path, e))?,
                _ => debug!("not loading program `{name}`: not a kprobe"),
            }
        }

        Ok(ebpf)
    }

    fn has_program(&self, object: &Ebpf, name: &str) -> bool {
        object.program(name).is_some()
    }

    fn take_map(&self, object: &mut Ebpf, name: &str) -> Option<Map> {
        object.take_map(name)
    }

    fn attach(&self, object: &mut Ebpf, entry_point: &EntryPoint) -> Result<AyaLink> {
        let Some(Program::KProbe(program)) = object.program_mut(&entry_point.name) else {
            return Err(Error::attach(&entry_point.name, "not a kprobe program"));
        };
        let target = entry_point.hook.kprobe_target();
        debug!("attaching `{}` to kprobe {target}", entry_point.name);
        let id = program
            .attach(target.as_str(), 0)
            .map_err(|e| Error::attach(&entry_point.name, e))?;

        Ok(AyaLink {
            program: entry_point.name.clone(),
            id,
        })
    }

    fn detach(&self, object: &mut Ebpf, link: AyaLink) {
        let Some(Program::KProbe(program)) = object.program_mut(&link.program) else {
            warn!("cannot detach `{}`: kprobe no longer in object", link.program);
            return;
        };
        if let Err(e) = program.detach(link.id) {
            warn!("failed to detach `{}`: {e}", link.program);
        }
    }

    fn unload(&self, object: &mut Ebpf, entry_point: &EntryPoint) {
        let Some(Program::KProbe(program)) = object.program_mut(&entry_point.name) else {
            return;
        };
        if let Err(e) = program.unload() {
            warn!("failed to unload `{}`: {e}", entry_point.name);
        }
    }

    fn close(&self, object: Ebpf) {
        drop(object);
    }
}

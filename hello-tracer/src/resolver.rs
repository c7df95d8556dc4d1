use log::debug;

use crate::{
    config::{EntryPointSpec, Hook},
    error::{Error, Result, SymbolKind},
    kernel::Kernel,
};

/// A program found in the loaded object, together with where it attaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub name: String,
    pub hook: Hook,
}

/// A map taken out of the loaded object under its configured name.
#[derive(Debug)]
pub struct MapBinding<M> {
    name: String,
    map: M,
}

impl<M> MapBinding<M> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }
}

/// Looks up every required program, keeping the requested order.
///
/// Fails on the first name the object does not export.
pub fn resolve_entry_points<K: Kernel>(
    kernel: &K,
    object: &K::Object,
    required: &[EntryPointSpec],
) -> Result<Vec<EntryPoint>> {
    required
        .iter()
        .map(|spec| {
            if !kernel.has_program(object, &spec.name) {
                return Err(Error::Resolve {
                    kind: SymbolKind::EntryPoint,
                    name: spec.name.clone(),
                });
            }
            debug!("resolved program `{}`", spec.name);
            Ok(EntryPoint {
                name: spec.name.clone(),
                hook: spec.hook.clone(),
            })
        })
        .collect()
}

/// Takes every required map out of the object, keeping the requested order.
///
/// Fails on the first missing name; maps already taken are dropped.
pub fn resolve_maps<K: Kernel>(
    kernel: &K,
    object: &mut K::Object,
    required: &[String],
) -> Result<Vec<MapBinding<K::Map>>> {
    required
        .iter()
        .map(|name| {
            let map = kernel
                .take_map(object, name)
                .ok_or_else(|| Error::Resolve {
                    kind: SymbolKind::Map,
                    name: name.clone(),
                })?;
            debug!("resolved map `{name}`");
            Ok(MapBinding {
                name: name.clone(),
                map,
            })
        })
        .collect()
}

/// Exact, case-sensitive lookup of a binding by name.
pub fn find_map<'a, M>(bindings: &'a [MapBinding<M>], name: &str) -> Option<&'a MapBinding<M>> {
    bindings.iter().find(|b| b.name == name)
}

pub fn find_map_mut<'a, M>(
    bindings: &'a mut [MapBinding<M>],
    name: &str,
) -> Option<&'a mut MapBinding<M>> {
    bindings.iter_mut().find(|b| b.name == name)
}

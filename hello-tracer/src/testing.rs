//! In-memory [`Kernel`] that records every call it receives.

use std::{cell::RefCell, path::Path, rc::Rc};

use crate::{
    error::{Error, Result},
    kernel::Kernel,
    resolver::EntryPoint,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Open,
    Load,
    Attach(String),
    Detach(String),
    Unload(String),
    Close,
}

#[derive(Default)]
struct State {
    programs: Vec<String>,
    maps: Vec<String>,
    fail_open: bool,
    fail_load: bool,
    fail_attach: Option<String>,
    live_links: Vec<String>,
    calls: Vec<Call>,
}

#[derive(Clone, Default)]
pub struct FakeKernel {
    state: Rc<RefCell<State>>,
}

pub struct FakeObject {
    programs: Vec<String>,
    maps: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct FakeMap(pub String);

impl FakeKernel {
    pub fn with_object(programs: &[&str], maps: &[&str]) -> Self {
        let kernel = Self::default();
        {
            let mut state = kernel.state.borrow_mut();
            state.programs = programs.iter().map(|p| p.to_string()).collect();
            state.maps = maps.iter().map(|m| m.to_string()).collect();
        }
        kernel
    }

    pub fn failing_open(self) -> Self {
        self.state.borrow_mut().fail_open = true;
        self
    }

    pub fn failing_load(self) -> Self {
        self.state.borrow_mut().fail_load = true;
        self
    }

    pub fn failing_attach(self, program: &str) -> Self {
        self.state.borrow_mut().fail_attach = Some(program.to_owned());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn live_links(&self) -> usize {
        self.state.borrow().live_links.len()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.state.borrow().calls.iter().filter(|c| *c == call).count()
    }
}

impl Kernel for FakeKernel {
    type Image = ();
    type Object = FakeObject;
    type Map = FakeMap;
    type Link = String;

    fn open(&self, path: &Path) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_open {
            return Err(Error::Open {
                path: path.to_owned(),
                source: std::io::ErrorKind::NotFound.into(),
            });
        }
        state.calls.push(Call::Open);
        Ok(())
    }

    fn load(&self, path: &Path, _image: ()) -> Result<FakeObject> {
        let mut state = self.state.borrow_mut();
        if state.fail_load {
            return Err(Error::load(path, "verifier rejected program"));
        }
        state.calls.push(Call::Load);
        Ok(FakeObject {
            programs: state.programs.clone(),
            maps: state.maps.clone(),
        })
    }

    fn has_program(&self, object: &FakeObject, name: &str) -> bool {
        object.programs.iter().any(|p| p == name)
    }

    fn take_map(&self, object: &mut FakeObject, name: &str) -> Option<FakeMap> {
        let index = object.maps.iter().position(|m| m == name)?;
        Some(FakeMap(object.maps.remove(index)))
    }

    fn attach(&self, _object: &mut FakeObject, entry_point: &EntryPoint) -> Result<String> {
        let mut state = self.state.borrow_mut();
        if state.fail_attach.as_deref() == Some(entry_point.name.as_str()) {
            return Err(Error::attach(&entry_point.name, "hook rejected"));
        }
        state.calls.push(Call::Attach(entry_point.name.clone()));
        state.live_links.push(entry_point.name.clone());
        Ok(entry_point.name.clone())
    }

    fn detach(&self, _object: &mut FakeObject, link: String) {
        let mut state = self.state.borrow_mut();
        if let Some(index) = state.live_links.iter().position(|l| *l == link) {
            state.live_links.remove(index);
        }
        state.calls.push(Call::Detach(link));
    }

    fn unload(&self, _object: &mut FakeObject, entry_point: &EntryPoint) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::Unload(entry_point.name.clone()));
    }

    fn close(&self, _object: FakeObject) {
        self.state.borrow_mut().calls.push(Call::Close);
    }
}

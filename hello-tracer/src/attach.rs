use log::debug;

use crate::{error::Result, kernel::Kernel, resolver::EntryPoint};

/// Live binding of one entry point to its hook.
#[derive(Debug)]
pub struct AttachmentLink<L> {
    entry_point: String,
    link: L,
}

impl<L> AttachmentLink<L> {
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }
}

/// Attaches `entry_points` in order, pushing each link onto `links`.
///
/// Stops at the first failure. Links attached before it stay in `links`, and
/// the caller must hand them to [`detach_all`].
pub fn attach_all<K: Kernel>(
    kernel: &K,
    object: &mut K::Object,
    entry_points: &[EntryPoint],
    links: &mut Vec<AttachmentLink<K::Link>>,
) -> Result<()> {
    for entry_point in entry_points {
        let link = kernel.attach(object, entry_point)?;
        debug!("attached `{}`", entry_point.name);
        links.push(AttachmentLink {
            entry_point: entry_point.name.clone(),
            link,
        });
    }
    Ok(())
}

/// Detaches every link in `links`, newest first, leaving it empty.
pub fn detach_all<K: Kernel>(
    kernel: &K,
    object: &mut K::Object,
    links: &mut Vec<AttachmentLink<K::Link>>,
) {
    while let Some(AttachmentLink { entry_point, link }) = links.pop() {
        kernel.detach(object, link);
        debug!("detached `{entry_point}`");
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{
        config::Hook,
        error::Error,
        loader::open_and_load,
        testing::{Call, FakeKernel},
    };

    fn entry_points(names: &[&str]) -> Vec<EntryPoint> {
        names
            .iter()
            .map(|name| EntryPoint {
                name: name.to_string(),
                hook: Hook::syscall("execve"),
            })
            .collect()
    }

    #[test]
    fn attaches_in_order_and_detaches_in_reverse() {
        let kernel = FakeKernel::with_object(&["a", "b", "c"], &[]);
        let mut object = open_and_load(&kernel, Path::new("x.o")).unwrap();
        let mut links = Vec::new();
        attach_all(&kernel, &mut object, &entry_points(&["a", "b", "c"]), &mut links).unwrap();
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].entry_point(), "a");

        detach_all(&kernel, &mut object, &mut links);
        assert!(links.is_empty());
        assert_eq!(kernel.live_links(), 0);
        assert_eq!(
            kernel.calls()[2..],
            [
                Call::Attach("a".into()),
                Call::Attach("b".into()),
                Call::Attach("c".into()),
                Call::Detach("c".into()),
                Call::Detach("b".into()),
                Call::Detach("a".into()),
            ]
        );
    }

    #[test]
    fn stops_at_first_failure_and_keeps_earlier_links() {
        let kernel = FakeKernel::with_object(&["a", "b", "c"], &[]).failing_attach("b");
        let mut object = open_and_load(&kernel, Path::new("x.o")).unwrap();
        let mut links = Vec::new();
        let err = attach_all(&kernel, &mut object, &entry_points(&["a", "b", "c"]), &mut links)
            .unwrap_err();
        assert!(matches!(err, Error::Attach { ref name, .. } if name == "b"));
        assert_eq!(links.len(), 1);
        assert_eq!(kernel.count(&Call::Attach("c".into())), 0);

        detach_all(&kernel, &mut object, &mut links);
        assert_eq!(kernel.live_links(), 0);
    }

    #[test]
    fn detach_all_on_empty_is_a_no_op() {
        let kernel = FakeKernel::with_object(&[], &[]);
        let mut object = open_and_load(&kernel, Path::new("x.o")).unwrap();
        let mut links = Vec::new();
        detach_all(&kernel, &mut object, &mut links);
        assert_eq!(kernel.calls(), [Call::Open, Call::Load]);
    }
}

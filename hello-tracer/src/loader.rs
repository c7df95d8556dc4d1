use std::path::Path;

use log::debug;

use crate::{error::Result, kernel::Kernel};

/// Opens the object at `path` and loads it into the kernel.
///
/// On success the kernel holds resources for the object until it is passed
/// to [`Kernel::close`].
pub fn open_and_load<K: Kernel>(kernel: &K, path: &Path) -> Result<K::Object> {
    let image = kernel.open(path)?;
    debug!("opened {}", path.display());
    let object = kernel.load(path, image)?;
    debug!("loaded {}", path.display());
    Ok(object)
}

/// Lifts the locked-memory limit.
///
/// Needed on kernels that predate memcg-based accounting of BPF memory, see
/// https://lwn.net/Articles/837122/
pub fn bump_memlock_rlimit() {
    let rlim = libc::rlimit {
        rlim_cur: libc::RLIM_INFINITY,
        rlim_max: libc::RLIM_INFINITY,
    };
    let ret = unsafe { libc::setrlimit(libc::RLIMIT_MEMLOCK, &rlim) };
    if ret != 0 {
        debug!("remove limit on locked memory failed, ret is: {ret}");
    }
}

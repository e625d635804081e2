use std::ffi::{c_char, c_int, c_void, CStr};
use std::path::{Path, PathBuf};
use libloading::Library;
use parking_lot::Mutex;
use crate::common::BboxContainer;
use crate::{Result, YoloError};

/// darknet keeps one global detector, so calls from different wrappers must not interleave.
static NATIVE_LOCK: Mutex<()> = parking_lot::const_mutex(());

const DEVICE_NAME_CAPACITY: usize = 512;

/// The native detector contract. Return codes are passed through untouched; interpreting them
/// is the wrapper's job.
pub trait DetectorBackend {
    /// Name used in error messages, normally the binary's file name.
    fn name(&self) -> &str;

    fn device_count(&self) -> i32;

    fn device_name(&self, gpu: i32) -> String;

    fn init(&mut self, config_file: &CStr, weights_file: &CStr, gpu: i32, batch_size: i32) -> i32;

    /// Decodes and detects an image file on disk.
    fn detect_image(&mut self, filename: &CStr, container: &mut BboxContainer) -> i32;

    /// Detects an encoded image (png, jpeg, bmp) held in memory. -1 means no OpenCV support.
    fn detect_mat(&mut self, data: &[u8], container: &mut BboxContainer) -> i32;

    /// # Safety
    /// `data` must point to `width * height * channels` readable floats in host memory.
    unsafe fn detect_objects(&mut self, data: *const f32, width: i32, height: i32, channels: i32,
                             container: &mut BboxContainer) -> i32;

    /// # Safety
    /// `data` must be a CUDA device pointer to `width * height * channels` floats.
    unsafe fn detect_objects_cuda(&mut self, data: *const c_void, width: i32, height: i32, channels: i32,
                                  container: &mut BboxContainer) -> i32;

    /// # Safety
    /// Same contract as [`DetectorBackend::detect_objects`].
    unsafe fn track_objects(&mut self, data: *const f32, width: i32, height: i32, channels: i32,
                            container: &mut BboxContainer) -> i32;

    fn network_width(&self) -> i32;

    fn network_height(&self) -> i32;

    fn dispose(&mut self) -> i32;
}

type InitFn = unsafe extern "C" fn(*const c_char, *const c_char, c_int, c_int) -> c_int;
type DetectImageFn = unsafe extern "C" fn(*const c_char, *mut BboxContainer) -> c_int;
type DetectMatFn = unsafe extern "C" fn(*const u8, c_int, *mut BboxContainer) -> c_int;
type DetectObjectsFn = unsafe extern "C" fn(*const f32, c_int, c_int, c_int, *mut BboxContainer) -> c_int;
type DetectObjectsCudaFn = unsafe extern "C" fn(*const c_void, c_int, c_int, c_int, *mut BboxContainer) -> c_int;
type NoArgFn = unsafe extern "C" fn() -> c_int;
type DeviceNameFn = unsafe extern "C" fn(c_int, *mut c_char) -> c_int;

/// The darknet shared library, loaded at runtime with every entry point resolved up front.
pub struct DarknetLibrary {
    path: PathBuf,
    name: String,
    init: InitFn,
    detect_image: DetectImageFn,
    detect_mat: DetectMatFn,
    detect_objects: DetectObjectsFn,
    detect_objects_cuda: DetectObjectsCudaFn,
    track_objects: DetectObjectsFn,
    network_width: NoArgFn,
    network_height: NoArgFn,
    dispose: NoArgFn,
    device_count: NoArgFn,
    device_name: DeviceNameFn,
    // Declared last so the function pointers above never outlive it.
    _library: Library,
}

impl std::fmt::Debug for DarknetLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DarknetLibrary").field("path", &self.path).finish()
    }
}

impl DarknetLibrary {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(YoloError::FileNotFound(path.to_path_buf()));
        }
        log::info!("Loading darknet library from {}", path.display());

        // SAFETY: loading runs the library's initializers; the darknet binary has no unsound
        // initialization requirements beyond its dependencies being present, which
        // native_deps verifies beforehand.
        let library = unsafe { Library::new(path)? };

        // SAFETY: the signatures mirror darknet's yolo_v2_class exports. Each symbol is copied
        // out as a plain function pointer and the library is kept alive alongside them.
        let (init, detect_image, detect_mat, detect_objects, detect_objects_cuda, track_objects) = unsafe {
            let init = *library.get::<InitFn>(b"init\0")?;
            let detect_image = *library.get::<DetectImageFn>(b"detect_image\0")?;
            let detect_mat = *library.get::<DetectMatFn>(b"detect_mat\0")?;
            let detect_objects = *library.get::<DetectObjectsFn>(b"detect_objects\0")?;
            let detect_objects_cuda = *library.get::<DetectObjectsCudaFn>(b"detect_objects_cuda\0")?;
            let track_objects = *library.get::<DetectObjectsFn>(b"track_objects\0")?;
            (init, detect_image, detect_mat, detect_objects, detect_objects_cuda, track_objects)
        };
        let (network_width, network_height, dispose, device_count, device_name) = unsafe {
            let network_width = *library.get::<NoArgFn>(b"get_detector_network_width\0")?;
            let network_height = *library.get::<NoArgFn>(b"get_detector_network_height\0")?;
            let dispose = *library.get::<NoArgFn>(b"dispose\0")?;
            let device_count = *library.get::<NoArgFn>(b"get_device_count\0")?;
            let device_name = *library.get::<DeviceNameFn>(b"get_device_name\0")?;
            (network_width, network_height, dispose, device_count, device_name)
        };

        Ok(Self {
            path: path.to_path_buf(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            init,
            detect_image,
            detect_mat,
            detect_objects,
            detect_objects_cuda,
            track_objects,
            network_width,
            network_height,
            dispose,
            device_count,
            device_name,
            _library: library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DetectorBackend for DarknetLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    fn device_count(&self) -> i32 {
        let _guard = NATIVE_LOCK.lock();
        unsafe { (self.device_count)() }
    }

    fn device_name(&self, gpu: i32) -> String {
        let mut buffer = vec![0 as c_char; DEVICE_NAME_CAPACITY];
        {
            let _guard = NATIVE_LOCK.lock();
            // SAFETY: darknet copies a NUL terminated name of at most 256 bytes into the buffer.
            unsafe { (self.device_name)(gpu, buffer.as_mut_ptr()) };
        }
        if let Some(last) = buffer.last_mut() {
            *last = 0;
        }
        // SAFETY: the buffer is NUL terminated by the line above at the latest.
        unsafe { CStr::from_ptr(buffer.as_ptr()) }.to_string_lossy().into_owned()
    }

    fn init(&mut self, config_file: &CStr, weights_file: &CStr, gpu: i32, batch_size: i32) -> i32 {
        let _guard = NATIVE_LOCK.lock();
        unsafe { (self.init)(config_file.as_ptr(), weights_file.as_ptr(), gpu, batch_size) }
    }

    fn detect_image(&mut self, filename: &CStr, container: &mut BboxContainer) -> i32 {
        let _guard = NATIVE_LOCK.lock();
        unsafe { (self.detect_image)(filename.as_ptr(), container) }
    }

    fn detect_mat(&mut self, data: &[u8], container: &mut BboxContainer) -> i32 {
        let Ok(size) = c_int::try_from(data.len()) else {
            return -2;
        };
        let _guard = NATIVE_LOCK.lock();
        unsafe { (self.detect_mat)(data.as_ptr(), size, container) }
    }

    unsafe fn detect_objects(&mut self, data: *const f32, width: i32, height: i32, channels: i32,
                             container: &mut BboxContainer) -> i32 {
        let _guard = NATIVE_LOCK.lock();
        (self.detect_objects)(data, width, height, channels, container)
    }

    unsafe fn detect_objects_cuda(&mut self, data: *const c_void, width: i32, height: i32, channels: i32,
                                  container: &mut BboxContainer) -> i32 {
        let _guard = NATIVE_LOCK.lock();
        (self.detect_objects_cuda)(data, width, height, channels, container)
    }

    unsafe fn track_objects(&mut self, data: *const f32, width: i32, height: i32, channels: i32,
                            container: &mut BboxContainer) -> i32 {
        let _guard = NATIVE_LOCK.lock();
        (self.track_objects)(data, width, height, channels, container)
    }

    fn network_width(&self) -> i32 {
        let _guard = NATIVE_LOCK.lock();
        unsafe { (self.network_width)() }
    }

    fn network_height(&self) -> i32 {
        let _guard = NATIVE_LOCK.lock();
        unsafe { (self.network_height)() }
    }

    fn dispose(&mut self) -> i32 {
        let _guard = NATIVE_LOCK.lock();
        unsafe { (self.dispose)() }
    }
}

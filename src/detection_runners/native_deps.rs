//! Precondition gate run before the darknet binary is loaded.
//!
//! Every native component darknet pulls in (CUDA runtime, cuDNN, OpenCV, pthreads and the
//! darknet binary itself) is checked for on disk so a missing piece fails with an error naming
//! it, instead of an opaque loader failure on the first native call.

use std::path::{Path, PathBuf};
use crate::common::InferenceDevice;
use crate::{Result, YoloError};

pub const CUDA_VERSION: &str = "12.0";
pub const CUDNN_VERSION: &str = "8.7.0";

pub const YOLO_DLL_WINDOWS: &str = "yolo_cpp_dll.dll";
pub const YOLO_SO_LINUX_X64: &str = "libdarknet_amd.so";
pub const YOLO_SO_LINUX_ARM64: &str = "libdarknet_arm.so";

const PTHREAD_DLL: &str = "pthreadVC2.dll";
const OPENCV_WORLD_DLL: &str = "opencv_world460.dll";
const CUDNN_DLL: &str = "cudnn64_8.dll";
const CUDNN_DEPENDENCY_DLL: &str = "cudnn_ops_infer64_8.dll";
const CUDA_RUNTIME_DLLS: [&str; 3] = ["cublas64_12.dll", "cudart64_12.dll", "curand64_10.dll"];
const OPENCV_LIBS: [&str; 5] = [
    "libopencv_highgui.so",
    "libopencv_videoio.so",
    "libopencv_imgcodecs.so",
    "libopencv_imgproc.so",
    "libopencv_core.so",
];
const OPENCV_HINT: &str = "is not available! Please install OPENCV again via sudo apt install libopencv libopencv-dev";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    Aarch64,
}

impl Arch {
    pub fn current() -> Self {
        if cfg!(target_arch = "aarch64") {
            Arch::Aarch64
        } else {
            Arch::X86_64
        }
    }

    fn gnu_triple_dir(&self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64-linux-gnu",
            Arch::Aarch64 => "aarch64-linux-gnu",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux { arch: Arch },
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Linux { arch: Arch::current() }
        }
    }

    /// File name of the darknet binary built for this platform.
    pub fn darknet_library_name(&self) -> &'static str {
        match self {
            Platform::Windows => YOLO_DLL_WINDOWS,
            Platform::Linux { arch: Arch::X86_64 } => YOLO_SO_LINUX_X64,
            Platform::Linux { arch: Arch::Aarch64 } => YOLO_SO_LINUX_ARM64,
        }
    }
}

/// Locations the checks look in. `from_env` fills them the way a normal install lays them out;
/// tests point them at scratch directories.
#[derive(Debug, Clone, Default)]
pub struct DependencyRoots {
    /// Directory of the darknet binary and the sidecar DLLs on Windows.
    pub lib_dir: PathBuf,
    /// `CUDA_PATH` (Windows).
    pub cuda_path: Option<PathBuf>,
    /// Windows system directory holding `nvcuda.dll`.
    pub system_dir: PathBuf,
    /// Multiarch library directory on Linux.
    pub linux_lib_dir: PathBuf,
    /// CUDA toolkit install directory on Linux.
    pub cuda_install_dir: PathBuf,
    /// Value of `PATH`.
    pub path_env: Option<String>,
}

impl DependencyRoots {
    pub fn from_env(platform: Platform, lib_dir: impl Into<PathBuf>) -> Self {
        let system_root = std::env::var("SystemRoot").unwrap_or_else(|_| r"C:\Windows".to_string());
        let linux_lib_dir = match platform {
            Platform::Linux { arch } => Path::new("/usr/lib").join(arch.gnu_triple_dir()),
            Platform::Windows => PathBuf::new(),
        };
        Self {
            lib_dir: lib_dir.into(),
            cuda_path: std::env::var_os("CUDA_PATH").filter(|p| !p.is_empty()).map(PathBuf::from),
            system_dir: Path::new(&system_root).join("System32"),
            linux_lib_dir,
            cuda_install_dir: PathBuf::from("/usr/local/cuda"),
            path_env: std::env::var("PATH").ok(),
        }
    }

    fn cuda_bin(&self) -> PathBuf {
        self.cuda_path.clone().unwrap_or_default().join("bin")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementKind {
    File(PathBuf),
    Dir(PathBuf),
    EnvVar { name: &'static str, present: bool },
    PathContains { path_env: Option<String>, dir: PathBuf },
}

/// One thing that must be present, and how to report its absence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub kind: RequirementKind,
    pub name: String,
    pub hint: String,
    /// Reported as a CUDA installation problem rather than a plain missing file.
    pub cuda: bool,
}

impl Requirement {
    fn file(path: PathBuf, hint: impl Into<String>) -> Self {
        let name = file_name(&path);
        Self { kind: RequirementKind::File(path), name, hint: hint.into(), cuda: false }
    }

    fn cuda_file(path: PathBuf, hint: impl Into<String>) -> Self {
        Self { cuda: true, ..Self::file(path, hint) }
    }

    pub fn is_satisfied(&self) -> bool {
        match &self.kind {
            RequirementKind::File(path) => path.is_file(),
            RequirementKind::Dir(path) => path.is_dir(),
            RequirementKind::EnvVar { present, .. } => *present,
            RequirementKind::PathContains { path_env, dir } => path_env
                .as_deref()
                .is_some_and(|p| !p.is_empty() && p.contains(dir.to_string_lossy().as_ref())),
        }
    }

    pub fn to_error(&self) -> YoloError {
        if self.cuda {
            YoloError::CudaNotAvailable(self.hint.clone())
        } else {
            YoloError::MissingDependency { name: self.name.clone(), hint: self.hint.clone() }
        }
    }
}

/// Ordered list of native requirements for one platform and device.
#[derive(Debug, Clone)]
pub struct NativeDependencies {
    platform: Platform,
    requirements: Vec<Requirement>,
}

impl NativeDependencies {
    pub fn plan(platform: Platform, device: InferenceDevice, roots: &DependencyRoots) -> Self {
        let mut requirements = match platform {
            Platform::Windows => windows_requirements(device, roots),
            Platform::Linux { .. } => linux_requirements(device, roots),
        };
        requirements.push(Requirement::file(
            roots.lib_dir.join(platform.darknet_library_name()),
            "The darknet binary must sit in the library directory.",
        ));
        Self { platform, requirements }
    }

    /// Plan for the running platform with roots taken from the environment.
    pub fn for_current(device: InferenceDevice, lib_dir: impl Into<PathBuf>) -> Self {
        let platform = Platform::current();
        Self::plan(platform, device, &DependencyRoots::from_env(platform, lib_dir))
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Fails with the first requirement that is not met.
    pub fn verify(&self) -> Result<()> {
        ensure_64_bit()?;
        for requirement in &self.requirements {
            if !requirement.is_satisfied() {
                log::warn!("Native dependency check failed: {}", requirement.name);
                return Err(requirement.to_error());
            }
            log::debug!("Found native dependency {}", requirement.name);
        }
        log::info!("All {} native dependencies found for {:?}", self.requirements.len(), self.platform);
        Ok(())
    }
}

pub fn ensure_64_bit() -> Result<()> {
    if cfg!(target_pointer_width = "64") {
        Ok(())
    } else {
        Err(YoloError::UnsupportedPlatform("Only 64-bit processes are supported".to_string()))
    }
}

fn windows_requirements(device: InferenceDevice, roots: &DependencyRoots) -> Vec<Requirement> {
    let mut requirements = vec![
        Requirement::file(roots.lib_dir.join(OPENCV_WORLD_DLL), "OpenCV must sit next to the darknet binary."),
        Requirement::file(roots.lib_dir.join(PTHREAD_DLL), "pthreads must sit next to the darknet binary."),
    ];
    if !device.needs_cuda() {
        return requirements;
    }

    let cuda_bin = roots.cuda_bin();
    requirements.push(Requirement {
        kind: RequirementKind::EnvVar { name: "CUDA_PATH", present: roots.cuda_path.is_some() },
        name: "CUDA_PATH".to_string(),
        hint: "CUDA_PATH environment variable is not available!".to_string(),
        cuda: true,
    });
    for dll in CUDA_RUNTIME_DLLS {
        requirements.push(Requirement::cuda_file(
            cuda_bin.join(dll),
            format!("{} wasn't found in the CUDA_PATH\\bin folder (did you maybe install an older CUDA and not CUDA {}+, \
                     please install it again or fix your CUDA_PATH)", dll, CUDA_VERSION),
        ));
    }
    requirements.push(Requirement::cuda_file(
        roots.system_dir.join("nvcuda.dll"),
        "nvcuda.dll wasn't found in the windows system directory, is CUDA and your Nvidia graphics driver correctly installed?",
    ));
    requirements.push(Requirement::file(
        cuda_bin.join(CUDNN_DLL),
        "Please install cudnn from https://developer.nvidia.com/rdp/cudnn-download",
    ));
    requirements.push(Requirement::cuda_file(
        cuda_bin.join(CUDNN_DEPENDENCY_DLL),
        format!("Cudnn dependencies not in CUDA_PATH, make sure Cudnn {} for Cuda {} is installed as well: \
                 https://developer.nvidia.com/rdp/cudnn-download", CUDNN_VERSION, CUDA_VERSION),
    ));
    requirements.push(Requirement {
        kind: RequirementKind::PathContains { path_env: roots.path_env.clone(), dir: cuda_bin.clone() },
        name: "PATH".to_string(),
        hint: format!("PATH does not contain CUDA bin folder like this: {}", cuda_bin.display()),
        cuda: true,
    });
    requirements
}

fn linux_requirements(device: InferenceDevice, roots: &DependencyRoots) -> Vec<Requirement> {
    let lib = &roots.linux_lib_dir;
    let mut requirements = Vec::new();
    if device.needs_cuda() {
        requirements.push(Requirement {
            kind: RequirementKind::Dir(roots.cuda_install_dir.clone()),
            name: "CUDA".to_string(),
            hint: "CUDA is not available!".to_string(),
            cuda: true,
        });
        requirements.push(Requirement::file(
            lib.join("libcudnn.so"),
            "CUDNN is not available! Please install it via sudo apt-get install libcudnn8 and add PATH of this file in .bashrc file",
        ));
    }
    requirements.push(Requirement::file(
        lib.join("libpthread.so"),
        "libpthread.so is not available! Please install via sudo apt-get install libpthread-stubs0-dev",
    ));
    for so in OPENCV_LIBS {
        requirements.push(Requirement::file(lib.join(so), format!("OPENCV dependency => {} {}", so, OPENCV_HINT)));
    }
    requirements
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

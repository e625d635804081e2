use std::fs;
use std::path::Path;
use fast_yolo::common::InferenceDevice;
use fast_yolo::detection_runners::native_deps::{
    ensure_64_bit, Arch, DependencyRoots, Platform, YOLO_DLL_WINDOWS, YOLO_SO_LINUX_ARM64, YOLO_SO_LINUX_X64,
};
use fast_yolo::detection_runners::NativeDependencies;
use fast_yolo::YoloError;

const LINUX: Platform = Platform::Linux { arch: Arch::X86_64 };

fn touch(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for name in names {
        fs::write(dir.join(name), "").unwrap();
    }
}

fn linux_install(root: &Path) -> DependencyRoots {
    let roots = DependencyRoots {
        lib_dir: root.join("darknet"),
        linux_lib_dir: root.join("usr/lib/x86_64-linux-gnu"),
        cuda_install_dir: root.join("usr/local/cuda"),
        ..DependencyRoots::default()
    };
    touch(&roots.lib_dir, &[YOLO_SO_LINUX_X64]);
    touch(&roots.linux_lib_dir, &[
        "libcudnn.so",
        "libpthread.so",
        "libopencv_highgui.so",
        "libopencv_videoio.so",
        "libopencv_imgcodecs.so",
        "libopencv_imgproc.so",
        "libopencv_core.so",
    ]);
    fs::create_dir_all(&roots.cuda_install_dir).unwrap();
    roots
}

fn windows_install(root: &Path) -> DependencyRoots {
    let cuda_path = root.join("CUDA").join("v12.0");
    let cuda_bin = cuda_path.join("bin");
    let roots = DependencyRoots {
        lib_dir: root.join("app"),
        cuda_path: Some(cuda_path),
        system_dir: root.join("System32"),
        path_env: Some(format!("{};{}", root.join("tools").display(), cuda_bin.display())),
        ..DependencyRoots::default()
    };
    touch(&roots.lib_dir, &["opencv_world460.dll", "pthreadVC2.dll", YOLO_DLL_WINDOWS]);
    touch(&cuda_bin, &[
        "cublas64_12.dll",
        "cudart64_12.dll",
        "curand64_10.dll",
        "cudnn64_8.dll",
        "cudnn_ops_infer64_8.dll",
    ]);
    touch(&roots.system_dir, &["nvcuda.dll"]);
    roots
}

#[test]
fn library_names_per_platform() {
    assert_eq!(Platform::Windows.darknet_library_name(), YOLO_DLL_WINDOWS);
    assert_eq!(LINUX.darknet_library_name(), YOLO_SO_LINUX_X64);
    assert_eq!(Platform::Linux { arch: Arch::Aarch64 }.darknet_library_name(), YOLO_SO_LINUX_ARM64);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn runs_in_64_bit_process() {
    assert!(ensure_64_bit().is_ok());
}

#[test]
fn complete_linux_install_verifies() {
    let dir = tempfile::tempdir().unwrap();
    let roots = linux_install(dir.path());

    NativeDependencies::plan(LINUX, InferenceDevice::CUDA(0), &roots).verify().unwrap();
}

#[test]
fn darknet_binary_is_checked_last() {
    let dir = tempfile::tempdir().unwrap();
    let plan = NativeDependencies::plan(LINUX, InferenceDevice::CUDA(0), &linux_install(dir.path()));

    let last = plan.requirements().last().unwrap();
    assert_eq!(last.name, YOLO_SO_LINUX_X64);
    assert_eq!(plan.platform(), LINUX);
}

#[test]
fn missing_cuda_dir_is_a_cuda_error() {
    let dir = tempfile::tempdir().unwrap();
    let roots = linux_install(dir.path());
    fs::remove_dir(&roots.cuda_install_dir).unwrap();

    let result = NativeDependencies::plan(LINUX, InferenceDevice::CUDA(0), &roots).verify();

    assert!(matches!(result, Err(YoloError::CudaNotAvailable(_))));
}

#[test]
fn missing_cudnn_names_the_library() {
    let dir = tempfile::tempdir().unwrap();
    let roots = linux_install(dir.path());
    fs::remove_file(roots.linux_lib_dir.join("libcudnn.so")).unwrap();

    match NativeDependencies::plan(LINUX, InferenceDevice::CUDA(0), &roots).verify() {
        Err(YoloError::MissingDependency { name, hint }) => {
            assert_eq!(name, "libcudnn.so");
            assert!(hint.contains("libcudnn8"));
        }
        other => panic!("expected MissingDependency, got {:?}", other),
    }
}

#[test]
fn missing_opencv_module_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let roots = linux_install(dir.path());
    fs::remove_file(roots.linux_lib_dir.join("libopencv_imgproc.so")).unwrap();

    let result = NativeDependencies::plan(LINUX, InferenceDevice::CUDA(0), &roots).verify();

    assert!(matches!(result, Err(YoloError::MissingDependency { name, .. }) if name == "libopencv_imgproc.so"));
}

#[test]
fn cpu_device_skips_cuda_checks() {
    let dir = tempfile::tempdir().unwrap();
    let roots = linux_install(dir.path());
    fs::remove_dir(&roots.cuda_install_dir).unwrap();
    fs::remove_file(roots.linux_lib_dir.join("libcudnn.so")).unwrap();

    NativeDependencies::plan(LINUX, InferenceDevice::CPU, &roots).verify().unwrap();
}

#[test]
fn complete_windows_install_verifies() {
    let dir = tempfile::tempdir().unwrap();
    let roots = windows_install(dir.path());

    NativeDependencies::plan(Platform::Windows, InferenceDevice::CUDA(0), &roots).verify().unwrap();
}

#[test]
fn windows_without_cuda_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let roots = DependencyRoots { cuda_path: None, ..windows_install(dir.path()) };

    match NativeDependencies::plan(Platform::Windows, InferenceDevice::CUDA(0), &roots).verify() {
        Err(YoloError::CudaNotAvailable(details)) => assert!(details.contains("CUDA_PATH")),
        other => panic!("expected CudaNotAvailable, got {:?}", other),
    }
}

#[test]
fn windows_path_must_contain_cuda_bin() {
    let dir = tempfile::tempdir().unwrap();
    let roots = DependencyRoots { path_env: Some("C:\\tools".to_string()), ..windows_install(dir.path()) };

    match NativeDependencies::plan(Platform::Windows, InferenceDevice::CUDA(0), &roots).verify() {
        Err(YoloError::CudaNotAvailable(details)) => assert!(details.starts_with("PATH does not contain")),
        other => panic!("expected CudaNotAvailable, got {:?}", other),
    }
}

#[test]
fn windows_missing_cudnn_is_a_dependency_error() {
    let dir = tempfile::tempdir().unwrap();
    let roots = windows_install(dir.path());
    fs::remove_file(roots.cuda_path.clone().unwrap().join("bin").join("cudnn64_8.dll")).unwrap();

    let result = NativeDependencies::plan(Platform::Windows, InferenceDevice::CUDA(0), &roots).verify();

    assert!(matches!(result, Err(YoloError::MissingDependency { name, .. }) if name == "cudnn64_8.dll"));
}

#[test]
fn windows_cpu_only_needs_sidecar_dlls() {
    let dir = tempfile::tempdir().unwrap();
    let roots = DependencyRoots { cuda_path: None, path_env: None, ..windows_install(dir.path()) };
    fs::remove_file(roots.lib_dir.join(YOLO_DLL_WINDOWS)).unwrap();

    let result = NativeDependencies::plan(Platform::Windows, InferenceDevice::CPU, &roots).verify();

    assert!(matches!(result, Err(YoloError::MissingDependency { name, .. }) if name == YOLO_DLL_WINDOWS));
}

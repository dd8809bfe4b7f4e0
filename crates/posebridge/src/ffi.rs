//! C entry points. Declarations for C callers are in `include/posebridge.h`.
//!
//! Every function catches panics and reports them as `PoseStatus::Internal`.
//! Sessions are opaque heap handles; a handle is used from one thread at a
//! time.

use crate::{PoseError, PoseKeypoint, PoseStatus, Session, SessionConfig, StepResult, JOINT_COUNT};
use posebridge_infer::ModelPaths;
use std::ffi::{c_char, CStr, CString};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

/// Opaque session handle.
pub struct PoseSession {
    session: Session,
    last_error: Option<CString>,
}

impl PoseSession {
    fn record<T>(&mut self, result: Result<T, PoseError>) -> Result<T, PoseStatus> {
        result.map_err(|e| {
            let status = e.status();
            self.last_error = CString::new(e.to_string()).ok();
            status
        })
    }
}

/// Step output laid out for C.
///
/// `frame_buffer` points into the session and is only valid until the next
/// call on that session. When `error_code` is `POSE_OK` it is never null.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct PoseStepResult {
    pub subject_count: u32,
    pub detected_keypoint_count: u32,
    pub keypoints: [PoseKeypoint; JOINT_COUNT],
    pub frame_buffer: *const u8,
    pub frame_len: usize,
    pub frame_width: u32,
    pub frame_height: u32,
    pub frame_channels: u32,
    pub frame_number: u64,
    pub error_code: PoseStatus,
}

impl PoseStepResult {
    fn failure(status: PoseStatus) -> Self {
        Self {
            subject_count: 0,
            detected_keypoint_count: 0,
            keypoints: [PoseKeypoint::default(); JOINT_COUNT],
            frame_buffer: ptr::null(),
            frame_len: 0,
            frame_width: 0,
            frame_height: 0,
            frame_channels: 0,
            frame_number: 0,
            error_code: status,
        }
    }
}

impl From<StepResult<'_>> for PoseStepResult {
    fn from(result: StepResult<'_>) -> Self {
        let frame = result.frame;
        Self {
            subject_count: result.subject_count as u32,
            detected_keypoint_count: result.detected_keypoint_count as u32,
            keypoints: result.keypoints,
            frame_buffer: frame.as_ptr(),
            frame_len: frame.len(),
            frame_width: frame.size().x as u32,
            frame_height: frame.size().y as u32,
            frame_channels: frame.channels() as u32,
            frame_number: result.frame_number,
            error_code: PoseStatus::Ok,
        }
    }
}

fn guard<T>(name: &str, fallback: T, f: impl FnOnce() -> T) -> T {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            log::error!("ffi: panic in {}", name);
            fallback
        }
    }
}

fn status_of(result: Result<(), PoseStatus>) -> PoseStatus {
    match result {
        Ok(()) => PoseStatus::Ok,
        Err(status) => status,
    }
}

/// # Safety
///
/// `ptr` must be null or a NUL-terminated string valid for `'a`.
unsafe fn opt_str<'a>(ptr: *const c_char, what: &str) -> Result<Option<&'a str>, PoseError> {
    if ptr.is_null() {
        return Ok(None);
    }
    // SAFETY: non-null and NUL-terminated per the caller's contract
    let s = unsafe { CStr::from_ptr(ptr) };
    s.to_str()
        .map(Some)
        .map_err(|_| PoseError::InvalidArgument(format!("{what} is not valid UTF-8")))
}

/// # Safety
///
/// Same as `opt_str`.
unsafe fn req_str<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, PoseError> {
    // SAFETY: forwarded contract
    unsafe { opt_str(ptr, what) }?
        .ok_or_else(|| PoseError::InvalidArgument(format!("{what} is null")))
}

/// Initialize logging. `log_dir` null logs to stdout, otherwise to daily files in `log_dir`.
///
/// Only the first successful call installs a logger.
///
/// # Safety
///
/// `log_dir` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pose_init_logging(log_dir: *const c_char) -> PoseStatus {
    guard("pose_init_logging", PoseStatus::Internal, || {
        // SAFETY: caller contract
        match unsafe { opt_str(log_dir, "log_dir") } {
            Ok(None) => {
                posebridge_base::init_stdout_logger();
                PoseStatus::Ok
            }
            Ok(Some(dir)) => match posebridge_base::init_file_logger(dir) {
                Ok(()) => PoseStatus::Ok,
                Err(e) => {
                    eprintln!("posebridge: cannot log to {}: {}", dir, e);
                    PoseStatus::InvalidArgument
                }
            },
            Err(e) => e.status(),
        }
    })
}

/// Number of canonical joint slots in every step result.
#[unsafe(no_mangle)]
pub extern "C" fn pose_joint_count() -> u32 {
    JOINT_COUNT as u32
}

/// Create a session using a registered backend and source provider.
///
/// `config_json` may be null for defaults. Returns null on failure; the
/// reason is logged.
///
/// # Safety
///
/// Every non-null argument must be a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pose_session_create(
    backend: *const c_char,
    provider: *const c_char,
    config_json: *const c_char,
) -> *mut PoseSession {
    guard("pose_session_create", ptr::null_mut(), || {
        let create = || -> Result<Session, PoseError> {
            // SAFETY: caller contract
            let backend = unsafe { req_str(backend, "backend") }?;
            let provider = unsafe { req_str(provider, "provider") }?;
            let config = match unsafe { opt_str(config_json, "config_json") }? {
                Some(json) => SessionConfig::from_json_str(json)?,
                None => SessionConfig::default(),
            };
            Session::from_registry(config, backend, provider)
        };
        match create() {
            Ok(session) => Box::into_raw(Box::new(PoseSession {
                session,
                last_error: None,
            })),
            Err(e) => {
                log::error!("ffi: cannot create session: {}", e);
                ptr::null_mut()
            }
        }
    })
}

/// Shut down and free a session. Null is ignored.
///
/// # Safety
///
/// `session` must be null or a handle from `pose_session_create` that has
/// not been destroyed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pose_session_destroy(session: *mut PoseSession) {
    if session.is_null() {
        return;
    }
    guard("pose_session_destroy", (), || {
        // SAFETY: handle came from Box::into_raw and is destroyed once
        drop(unsafe { Box::from_raw(session) });
    })
}

/// Load the pose model. `aux1` and `aux2` are optional vendor side files.
///
/// # Safety
///
/// `session` must be a live handle or null; strings must be null or valid
/// NUL-terminated strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pose_initialize(
    session: *mut PoseSession,
    model: *const c_char,
    aux1: *const c_char,
    aux2: *const c_char,
) -> PoseStatus {
    // SAFETY: caller contract
    let Some(handle) = (unsafe { session.as_mut() }) else {
        return PoseStatus::InvalidArgument;
    };
    guard("pose_initialize", PoseStatus::Internal, || {
        let load = |session: &mut Session| -> Result<(), PoseError> {
            // SAFETY: caller contract
            let mut paths = ModelPaths::new(unsafe { req_str(model, "model") }?);
            for aux in [aux1, aux2] {
                if let Some(path) = unsafe { opt_str(aux, "aux") }? {
                    paths = paths.with_aux(path);
                }
            }
            session.initialize(&paths)
        };
        let result = load(&mut handle.session);
        status_of(handle.record(result))
    })
}

/// Open `uri` and begin capturing.
///
/// # Safety
///
/// `session` must be a live handle or null; `uri` must be null or a valid
/// NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pose_start(session: *mut PoseSession, uri: *const c_char) -> PoseStatus {
    // SAFETY: caller contract
    let Some(handle) = (unsafe { session.as_mut() }) else {
        return PoseStatus::InvalidArgument;
    };
    guard("pose_start", PoseStatus::Internal, || {
        // SAFETY: caller contract
        let result = unsafe { req_str(uri, "uri") }.and_then(|uri| handle.session.start(uri));
        status_of(handle.record(result))
    })
}

/// Capture one frame and run inference.
///
/// # Safety
///
/// `session` must be a live handle or null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pose_step(session: *mut PoseSession) -> PoseStepResult {
    // SAFETY: caller contract
    let Some(handle) = (unsafe { session.as_mut() }) else {
        return PoseStepResult::failure(PoseStatus::InvalidArgument);
    };
    guard(
        "pose_step",
        PoseStepResult::failure(PoseStatus::Internal),
        || match handle.session.step() {
            Ok(result) => PoseStepResult::from(result),
            Err(e) => {
                let status = e.status();
                handle.last_error = CString::new(e.to_string()).ok();
                PoseStepResult::failure(status)
            }
        },
    )
}

/// Close the capture source. Null or a non-capturing session is a no-op.
///
/// # Safety
///
/// `session` must be a live handle or null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pose_stop(session: *mut PoseSession) {
    // SAFETY: caller contract
    if let Some(handle) = unsafe { session.as_mut() } {
        guard("pose_stop", (), || handle.session.stop());
    }
}

/// Release the source and engine. The handle stays valid until destroyed.
///
/// # Safety
///
/// `session` must be a live handle or null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pose_shutdown(session: *mut PoseSession) {
    // SAFETY: caller contract
    if let Some(handle) = unsafe { session.as_mut() } {
        guard("pose_shutdown", (), || handle.session.shutdown());
    }
}

/// Current `SessionState` as an integer, or -1 for a null handle.
///
/// # Safety
///
/// `session` must be a live handle or null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pose_session_state(session: *const PoseSession) -> i32 {
    // SAFETY: caller contract
    match unsafe { session.as_ref() } {
        Some(handle) => handle.session.state() as i32,
        None => -1,
    }
}

/// Message of the most recent failed call on this session, or null.
///
/// The string is owned by the session and valid until the next failing
/// call or `pose_session_destroy`.
///
/// # Safety
///
/// `session` must be a live handle or null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pose_session_last_error(session: *const PoseSession) -> *const c_char {
    // SAFETY: caller contract
    match unsafe { session.as_ref() }.and_then(|handle| handle.last_error.as_ref()) {
        Some(message) => message.as_ptr(),
        None => ptr::null(),
    }
}

use anyhow::{Result, anyhow};

/// Runs `create` inside a validation error scope.
///
/// Anything wgpu rejects while `create` runs comes back as `Err` instead of
/// reaching the device's uncaptured-error handler, which panics by default.
pub(crate) fn validated<T>(
    device: &wgpu::Device,
    what: &str,
    create: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let created = create();
    let captured = pollster::block_on(scope.pop());

    let value = created?;
    match captured {
        Some(err) => Err(anyhow!("{what} rejected by wgpu: {err}")),
        None => Ok(value),
    }
}

use verdant_core::{Capability, VerdantError};

/// Await every task concurrently, giving up when `deadline` elapses.
///
/// Results keep the order of `tasks`. The timeout error carries the generic
/// label `"request"`; operations relabel it with their own capability.
///
/// # Errors
/// Returns `RequestTimeout` when `deadline` elapses before every task completes.
pub async fn join_with_deadline<I, F, T>(
    tasks: I,
    deadline: Option<std::time::Duration>,
) -> Result<Vec<T>, VerdantError>
where
    I: IntoIterator<Item = F>,
    F: core::future::Future<Output = T>,
{
    crate::core::with_request_deadline(deadline, futures::future::join_all(tasks)).await
}

/// Reduce the errors of one failed single-location fetch to one error.
///
/// Checked in order:
/// 1. nothing attempted, or only `Unsupported` answers: `Unsupported(capability)`
/// 2. only `ProviderTimeout`: `AllProvidersTimedOut(capability)`
/// 3. only `NotFound` and a label given: `NotFound(label)`
/// 4. anything else: `AllProvidersFailed(errors)`
#[must_use]
pub fn collapse_errors(
    capability: Capability,
    attempted_any: bool,
    errors: Vec<VerdantError>,
    not_found_label: Option<String>,
) -> VerdantError {
    if !attempted_any
        || (!errors.is_empty()
            && errors
                .iter()
                .all(|e| matches!(e, VerdantError::Unsupported { .. })))
    {
        return VerdantError::unsupported(capability.as_str());
    }
    if !errors.is_empty()
        && errors
            .iter()
            .all(|e| matches!(e, VerdantError::ProviderTimeout { .. }))
    {
        return VerdantError::AllProvidersTimedOut {
            capability: capability.to_string(),
        };
    }
    if let Some(label) = not_found_label
        && !errors.is_empty()
        && errors
            .iter()
            .all(|e| matches!(e, VerdantError::NotFound { .. }))
    {
        return VerdantError::not_found(label);
    }
    VerdantError::AllProvidersFailed(errors)
}

/// Relabel a generic request deadline with the operation's capability.
pub(crate) fn relabel_timeout(capability: Capability, e: VerdantError) -> VerdantError {
    match e {
        VerdantError::RequestTimeout { .. } => VerdantError::request_timeout(capability.as_str()),
        other => other,
    }
}

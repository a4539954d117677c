use crate::domain::model::LastInputs;
use crate::domain::ports::Storage;
use crate::utils::error::Result;

pub const LAST_INPUTS_FILE: &str = "last_inputs.json";

/// A missing or unreadable file just means nothing was remembered.
pub async fn load_last_inputs<S: Storage>(storage: &S) -> LastInputs {
    let bytes = match storage.read_file(LAST_INPUTS_FILE).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("No remembered inputs: {}", e);
            return LastInputs::default();
        }
    };

    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable {}: {}", LAST_INPUTS_FILE, e);
        LastInputs::default()
    })
}

pub async fn save_last_inputs<S: Storage>(storage: &S, inputs: &LastInputs) -> Result<()> {
    let json = serde_json::to_vec_pretty(inputs)?;
    storage.write_file(LAST_INPUTS_FILE, &json).await?;
    tracing::debug!("Remembered inputs in {}", LAST_INPUTS_FILE);
    Ok(())
}

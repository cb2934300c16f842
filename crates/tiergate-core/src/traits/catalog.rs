// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model pricing and capability lookups over an externally maintained catalog.

use crate::types::{ModelCapabilities, ModelPricing};

/// Key lookups by model id. Both return `None` for unknown models.
pub trait ModelCatalog: Send + Sync {
    fn pricing(&self, model: &str) -> Option<ModelPricing>;

    fn capabilities(&self, model: &str) -> Option<ModelCapabilities>;

    /// Whether the model declares tool/function calling support.
    fn supports_tool_calling(&self, model: &str) -> bool {
        self.capabilities(model).is_some_and(|c| c.tool_calling)
    }
}

// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in model catalog.
//!
//! Prices are USD per million tokens as published by each provider. The
//! proxy layer normally supplies its own catalog; this one backs the CLI and
//! tests.

use std::collections::HashMap;

use tiergate_core::{ModelCapabilities, ModelCatalog, ModelPricing};

/// One catalog row.
#[derive(Debug, Clone, Copy)]
struct CatalogEntry {
    pricing: ModelPricing,
    capabilities: ModelCapabilities,
}

/// In-memory catalog keyed by model id.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: HashMap<String, CatalogEntry>,
}

/// `(id, input $/MTok, output $/MTok, tool calling, context window)`.
const BUILTIN: &[(&str, f64, f64, bool, u64)] = &[
    ("google/gemini-2.5-flash", 0.30, 2.50, true, 1_048_576),
    ("google/gemini-2.5-pro", 1.25, 10.0, true, 1_048_576),
    ("deepseek/deepseek-chat", 0.27, 1.10, true, 65_536),
    ("deepseek/deepseek-reasoner", 0.55, 2.19, false, 65_536),
    ("openai/gpt-4o-mini", 0.15, 0.60, true, 128_000),
    ("openai/gpt-4o", 2.50, 10.0, true, 128_000),
    ("openai/gpt-4.1-mini", 0.40, 1.60, true, 1_047_576),
    ("openai/gpt-4.1", 2.00, 8.00, true, 1_047_576),
    ("openai/o3-mini", 1.10, 4.40, true, 200_000),
    ("anthropic/claude-haiku-4.5", 1.00, 5.00, true, 200_000),
    ("anthropic/claude-sonnet-4", 3.00, 15.0, true, 200_000),
    ("anthropic/claude-opus-4", 15.0, 75.0, true, 200_000),
];

impl StaticCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog covering every model in the default tier tables.
    pub fn builtin() -> Self {
        BUILTIN
            .iter()
            .fold(Self::new(), |catalog, &(id, input, output, tools, window)| {
                catalog.with_model(
                    id,
                    ModelPricing {
                        input_per_mtok: input,
                        output_per_mtok: output,
                    },
                    ModelCapabilities {
                        tool_calling: tools,
                        context_window: Some(window),
                    },
                )
            })
    }

    /// Add or replace one model.
    pub fn with_model(
        mut self,
        id: impl Into<String>,
        pricing: ModelPricing,
        capabilities: ModelCapabilities,
    ) -> Self {
        self.entries.insert(
            id.into(),
            CatalogEntry {
                pricing,
                capabilities,
            },
        );
        self
    }

    /// Remove one model, returning whether it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ModelCatalog for StaticCatalog {
    fn pricing(&self, model: &str) -> Option<ModelPricing> {
        self.entries.get(model).map(|e| e.pricing)
    }

    fn capabilities(&self, model: &str) -> Option<ModelCapabilities> {
        self.entries.get(model).map(|e| e.capabilities)
    }
}

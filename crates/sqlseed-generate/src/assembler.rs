use sqlseed_core::{Row, TableSchema};

use crate::errors::SynthesisError;
use crate::synthesizer::{ValueSource, ValueSynthesizer};

/// A complete row and the synthesis effort behind it.
#[derive(Debug, Clone)]
pub struct AssembledRow {
    pub row: Row,
    pub model_attempts: u64,
    pub timeouts: u64,
    pub fallbacks: u64,
}

/// Builds whole rows by synthesizing each column in declaration order.
///
/// Columns are independent of each other; a row either has every column or
/// is not produced at all.
pub struct RowAssembler<'a> {
    schema: &'a TableSchema,
    synthesizer: &'a ValueSynthesizer,
}

impl<'a> RowAssembler<'a> {
    pub fn new(schema: &'a TableSchema, synthesizer: &'a ValueSynthesizer) -> Self {
        Self {
            schema,
            synthesizer,
        }
    }

    pub async fn assemble_row(&self, row_index: u64) -> Result<AssembledRow, SynthesisError> {
        let mut row = Row::new();
        let mut model_attempts = 0;
        let mut timeouts = 0;
        let mut fallbacks = 0;

        for column in &self.schema.columns {
            let synthesized = self.synthesizer.synthesize(column, row_index).await?;
            model_attempts += u64::from(synthesized.attempts);
            timeouts += u64::from(synthesized.timeouts);
            if synthesized.source == ValueSource::Mock {
                fallbacks += 1;
            }
            row.insert(column.name.clone(), synthesized.value);
        }

        Ok(AssembledRow {
            row,
            model_attempts,
            timeouts,
            fallbacks,
        })
    }
}

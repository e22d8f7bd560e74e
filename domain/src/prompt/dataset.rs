//! Dataset-search prompts

use super::formatter::TaskFormatter;
use super::template;
use crate::core::task::{Mode, Task};
use crate::orchestration::role::AgentRole;

pub struct DatasetFormatter;

impl TaskFormatter for DatasetFormatter {
    fn mode(&self) -> Mode {
        Mode::DatasetSearch
    }

    fn agent_prompt(&self, role: AgentRole, task: &Task) -> String {
        let body = "Suggest public datasets matching the description (GEO, SRA, ENA, ArrayExpress, \
                    PDB, UniProt or similar). For each give the repository, accession identifier, \
                    organism, assay type and a one-line reason it matches. \
                    Never invent accession identifiers; say so when unsure.";
        template::agent_prompt(role, body, task)
    }

    fn judge_instruction(&self, _task: &Task) -> String {
        "Merge the candidate datasets into one ranked markdown table \
         (rank, repository, accession, organism, assay, why it matches). \
         Remove duplicates and drop any accession only one agent mentioned without support."
            .to_string()
    }
}

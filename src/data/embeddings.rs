

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::info;

use crate::core::error::{PlannerError, Result};
use crate::planner::similarity::cosine_similarity;


/// Word-embedding space whose vocabulary contains canonical category names.
pub trait CategoryEmbeddings: Send + Sync {

    fn vector(&self, word: &str) -> Option<&[f32]>;


    fn most_similar(&self, word: &str, top_n: usize) -> Vec<(String, f64)>;

    fn contains(&self, word: &str) -> bool {
        self.vector(word).is_some()
    }
}


/// In-memory word2vec model read from the plain-text export format.
#[derive(Debug, Clone, Default)]
pub struct Word2VecModel {
    words: Vec<String>,
    vectors: Vec<Vec<f32>>,
    index: HashMap<String, usize>,
    dims: usize,
}

impl Word2VecModel {

    pub fn from_entries(entries: Vec<(String, Vec<f32>)>) -> Result<Self> {
        let mut model = Self::default();
        for (word, vector) in entries {
            model.insert(word, vector)?;
        }
        Ok(model)
    }

    fn insert(&mut self, word: String, vector: Vec<f32>) -> Result<()> {
        if self.dims == 0 {
            self.dims = vector.len();
        } else if vector.len() != self.dims {
            return Err(PlannerError::Embedding(format!(
                "'{word}' has {} dimensions, expected {}",
                vector.len(),
                self.dims
            )));
        }
        self.index.insert(word.clone(), self.words.len());
        self.words.push(word);
        self.vectors.push(vector);
        Ok(())
    }


    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading category embeddings from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }


    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut model = Self::default();
        let mut declared_dims = None;

        for (line_no, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }

            // "<vocab size> <dims>" header line
            if line_no == 0 && tokens.len() == 2 && tokens.iter().all(|t| t.parse::<usize>().is_ok()) {
                declared_dims = tokens[1].parse::<usize>().ok();
                continue;
            }

            let dims = declared_dims.unwrap_or(tokens.len() - 1);
            if dims == 0 || tokens.len() <= dims {
                return Err(PlannerError::Embedding(format!(
                    "line {} has no vector values",
                    line_no + 1
                )));
            }

            let split = tokens.len() - dims;
            let word = tokens[..split].join(" ");
            let vector = tokens[split..]
                .iter()
                .map(|t| t.parse::<f32>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| PlannerError::Embedding(format!("line {}: {e}", line_no + 1)))?;

            model.insert(word, vector)?;
        }

        info!("Category embeddings loaded: words={}, dims={}", model.len(), model.dims);
        Ok(model)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn dims(&self) -> usize {
        self.dims
    }
}

impl CategoryEmbeddings for Word2VecModel {
    fn vector(&self, word: &str) -> Option<&[f32]> {
        self.index.get(word).map(|&i| self.vectors[i].as_slice())
    }

    fn most_similar(&self, word: &str, top_n: usize) -> Vec<(String, f64)> {
        let Some(&target) = self.index.get(word) else {
            return Vec::new();
        };
        let query = &self.vectors[target];

        let mut scored: Vec<(String, f64)> = self
            .words
            .iter()
            .zip(self.vectors.iter())
            .enumerate()
            .filter(|(i, _)| *i != target)
            .map(|(_, (w, v))| (w.clone(), cosine_similarity(query, v)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(top_n);
        scored
    }
}

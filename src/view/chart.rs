//! Chart State
//!
//! Chart objects owned by the dashboard view. Updates replace the label and
//! data arrays wholesale, then request a redraw.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Doughnut,
    Radar,
}

/// One named series
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
}

impl Dataset {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            data: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    redraws: u64,
}

impl Chart {
    /// Daily hours trend: You vs. Average
    pub fn line() -> Self {
        Self {
            kind: ChartKind::Line,
            labels: Vec::new(),
            datasets: vec![Dataset::new("You"), Dataset::new("Average")],
            redraws: 0,
        }
    }

    /// Aerobic vs. Anaerobic split
    pub fn doughnut() -> Self {
        Self {
            kind: ChartKind::Doughnut,
            labels: vec!["Aerobic".to_string(), "Anaerobic".to_string()],
            datasets: vec![Dataset {
                label: String::new(),
                data: vec![0.0, 0.0],
            }],
            redraws: 0,
        }
    }

    /// Per-category comparison: You vs. Average
    pub fn radar() -> Self {
        Self {
            kind: ChartKind::Radar,
            labels: Vec::new(),
            datasets: vec![Dataset::new("You"), Dataset::new("Average")],
            redraws: 0,
        }
    }

    pub fn set_labels(&mut self, labels: Vec<String>) {
        self.labels = labels;
    }

    /// Replace the data of dataset `index`; out-of-range indexes are ignored
    pub fn set_data(&mut self, index: usize, data: Vec<f64>) {
        if let Some(dataset) = self.datasets.get_mut(index) {
            dataset.data = data;
        }
    }

    /// Request a full redraw
    pub fn update(&mut self) {
        self.redraws += 1;
    }

    /// Number of redraws requested so far
    pub fn redraws(&self) -> u64 {
        self.redraws
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ChartKind::Doughnut => {
                let data = self.datasets.first().map(|d| d.data.as_slice()).unwrap_or(&[]);
                for (label, value) in self.labels.iter().zip(data) {
                    writeln!(f, "  {:<16} {:>8.1}", label, value)?;
                }
            }
            ChartKind::Line | ChartKind::Radar => {
                write!(f, "  {:<16}", "")?;
                for dataset in &self.datasets {
                    write!(f, " {:>8}", dataset.label)?;
                }
                writeln!(f)?;

                for (i, label) in self.labels.iter().enumerate() {
                    write!(f, "  {:<16}", label)?;
                    for dataset in &self.datasets {
                        match dataset.data.get(i) {
                            Some(v) => write!(f, " {:>8.1}", v)?,
                            None => write!(f, " {:>8}", "-")?,
                        }
                    }
                    writeln!(f)?;
                }
            }
        }
        Ok(())
    }
}

use crate::error::Result;
use crate::readers::station_reader::column_index;
use crate::utils::constants::COUNTRY_COLUMN;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub total_rows: usize,
    /// Sorted, distinct
    pub countries: Vec<String>,
}

impl DatasetSummary {
    pub fn detailed_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("=== Dataset Summary ===\n");
        summary.push_str(&format!("Total Rows: {}\n", self.total_rows));
        summary.push_str(&format!("Countries: {}\n", self.countries.len()));
        for country in &self.countries {
            summary.push_str(&format!("  {}\n", country));
        }
        summary
    }
}

/// Row count and country list of a temperature CSV (by city or by country)
pub struct DatasetAnalyzer;

impl DatasetAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze_csv(&self, path: &Path) -> Result<DatasetSummary> {
        self.analyze_reader(csv::Reader::from_path(path)?)
    }

    pub fn analyze_reader<R: Read>(&self, mut reader: csv::Reader<R>) -> Result<DatasetSummary> {
        let country_col = column_index(reader.headers()?, COUNTRY_COLUMN)?;

        let mut total_rows = 0;
        let mut countries = BTreeSet::new();
        let mut record = csv::StringRecord::new();
        while reader.read_record(&mut record)? {
            total_rows += 1;
            if let Some(country) = record.get(country_col) {
                if !countries.contains(country) {
                    countries.insert(country.to_string());
                }
            }
        }

        Ok(DatasetSummary {
            total_rows,
            countries: countries.into_iter().collect(),
        })
    }
}

impl Default for DatasetAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_and_sorts() {
        let data = "\
dt,AverageTemperature,AverageTemperatureUncertainty,Country
1743-11-01,4.384,2.294,Åland
1743-11-01,,,Zimbabwe
1744-04-01,1.53,1.68,Albania
1744-05-01,6.70,1.78,Åland
";
        let summary = DatasetAnalyzer::new()
            .analyze_reader(csv::Reader::from_reader(data.as_bytes()))
            .unwrap();

        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.countries, vec!["Albania", "Zimbabwe", "Åland"]);
        assert!(summary.detailed_summary().contains("Countries: 3"));
    }
}

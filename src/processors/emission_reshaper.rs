use crate::models::EmissionRecord;
use crate::readers::WideEmissionTable;

/// Melt the wide CO2 table into `(Country, Year, CO2)` rows.
///
/// Rows come out year by year, and within a year in the table's country order.
pub fn melt_emissions(table: &WideEmissionTable) -> Vec<EmissionRecord> {
    let mut records = Vec::with_capacity(table.years.len() * table.rows.len());

    for (col, &year) in table.years.iter().enumerate() {
        for row in &table.rows {
            let co2 = row.values.get(col).copied().flatten();
            records.push(EmissionRecord::new(row.country.clone(), year, co2));
        }
    }

    records
}

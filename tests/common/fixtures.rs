use tally::{
    BandSizes, FunctionConfig, GroupDefinition, ReportDefinition, Scope, TableDataSource, Value,
};

pub const ROW_DIMENSION_A: &str = "Row-Dimension-A";
pub const ROW_DIMENSION_B: &str = "Row-Dimension-B";
pub const VALUE: &str = "Value";

/// Two nested dimensions over 20 rows, with the expected per-page item
/// counts of both group instances stored alongside each row.
pub fn relational_rows() -> TableDataSource {
    let rows: [(&str, &str, i64, i64, i64); 20] = [
        ("RA", "r1", 1, 1, 5),
        ("RA", "r2", 2, 1, 5),
        ("RA", "r1", 1, 3, 5),
        ("RA", "r1", 1, 3, 5),
        ("RA", "r1", 2, 3, 5), // page break
        ("RA", "r2", 1, 3, 3),
        ("RA", "r2", 1, 3, 3),
        ("RA", "r2", 2, 3, 3),
        ("RB", "r1", 1, 4, 4),
        ("RB", "r1", 1, 4, 4),
        ("RB", "r1", 1, 4, 4),
        ("RB", "r1", 2, 4, 4), // page break
        ("RB", "r1", 1, 1, 8),
        ("RB", "r2", 2, 7, 8),
        ("RB", "r2", 1, 7, 8),
        ("RB", "r2", 1, 7, 8),
        ("RB", "r2", 1, 7, 8),
        ("RB", "r2", 2, 7, 8),
        ("RB", "r2", 2, 7, 8),
        ("RB", "r2", 2, 7, 8),
    ];

    let mut table = TableDataSource::new([
        ROW_DIMENSION_A,
        ROW_DIMENSION_B,
        VALUE,
        "validate-row-b-sum",
        "validate-row-a-sum",
    ]);
    for (a, b, value, b_sum, a_sum) in rows {
        table
            .add_row([a.into(), b.into(), value.into(), b_sum.into(), a_sum.into()])
            .expect("row matches the column count");
    }
    table
}

/// Both dimensions repeat their header and footer on every page; each level
/// gets a total-mode count of its items on the current page.
pub fn page_item_count_report() -> ReportDefinition {
    let count = |name: &str, group: &str| {
        FunctionConfig::count(name, Scope::page_group(group))
            .with_level(1)
            .total()
    };
    ReportDefinition::new()
        .with_group(GroupDefinition::new(ROW_DIMENSION_A, [ROW_DIMENSION_A]).repeating())
        .with_group(GroupDefinition::new(ROW_DIMENSION_B, [ROW_DIMENSION_B]).repeating())
        .with_function(count("row-b-sum", "::group-1"))
        .with_function(count("row-a-sum", "::group-0"))
        .with_band_sizes(BandSizes::uniform(20.0))
}

/// A single `Region` level with `Amount` values; `sizes` gives the number of
/// rows of each region, in order.
pub fn regions(sizes: &[usize]) -> TableDataSource {
    let mut table = TableDataSource::new(["Region", "Amount"]);
    let mut amount = 0i64;
    for (region, size) in sizes.iter().enumerate() {
        for _ in 0..*size {
            amount += 1;
            table
                .add_row([Value::from(format!("region-{}", region)), Value::from(amount)])
                .expect("row matches the column count");
        }
    }
    table
}

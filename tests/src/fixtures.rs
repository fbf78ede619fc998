//! Test fixtures: CSV tables in each column dialect.

/// Modern dialect header.
pub const MODERN_HEADER: &str = "date,state,district,pincode,age_0_5,age_5_17,age_18_greater";

/// Legacy dialect header (no 0-5 bucket).
pub const LEGACY_HEADER: &str = "Date,State,District,Pincode,Demo_age_5_17,Demo_age_17+";

/// Legacy dialect with the alternate 17+ suffix.
pub const ALTERNATE_HEADER: &str = "Date,State,District,Pincode,Demo_age_5_17,demo_age_17_";

/// Builds a CSV body from a header and data lines.
pub fn csv(header: &str, rows: &[&str]) -> String {
    let mut out = String::from(header);
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out
}

/// The same two entries expressed in the modern dialect.
pub fn modern_pair() -> String {
    csv(
        MODERN_HEADER,
        &[
            "05-03-2024,Goa,North Goa,403001,0,4,7",
            "06-03-2024,Goa,South Goa,403601,0,1,1",
        ],
    )
}

/// The same two entries expressed in the legacy dialect.
pub fn legacy_pair() -> String {
    csv(
        LEGACY_HEADER,
        &[
            "05-03-2024,Goa,North Goa,403001,4,7",
            "06-03-2024,Goa,South Goa,403601,1,1",
        ],
    )
}

/// The same two entries expressed in the alternate legacy dialect.
pub fn alternate_pair() -> String {
    csv(
        ALTERNATE_HEADER,
        &[
            "2024-03-05,Goa,North Goa,403001,4,7",
            "2024-03-06,Goa,South Goa,403601,1,1",
        ],
    )
}

/// Rows whose per-record totals are 5, 15, 9 and 10.
pub fn anomaly_rows() -> String {
    csv(
        MODERN_HEADER,
        &[
            "01-01-2024,Kerala,Kochi,682001,1,2,2",
            "02-01-2024,Kerala,Kollam,691001,5,5,5",
            "03-01-2024,Kerala,Thrissur,680001,3,3,3",
            "04-01-2024,Kerala,Kannur,670001,2,3,5",
        ],
    )
}

/// Entries across two states with one district shared by name.
pub fn multi_state() -> String {
    csv(
        MODERN_HEADER,
        &[
            "01-02-2024,Bihar,Patna,800001,10,0,0",
            "01-02-2024,Bihar,Gaya,823001,5,0,0",
            "02-02-2024,Bihar,Patna,800001,1,1,1",
            "01-02-2024,Assam,Kamrup,781001,3,0,0",
            "01-02-2024,Assam,Aurangabad,781002,1,0,0",
            "01-02-2024,Bihar,Aurangabad,824101,2,0,0",
        ],
    )
}

/// Mix of valid rows and rows that must be discarded.
pub fn with_defects() -> String {
    csv(
        MODERN_HEADER,
        &[
            "05-03-2024,Goa,North Goa,403001,1,1,1",
            ",Goa,North Goa,403001,1,1,1",
            "05-03-2024,NA,North Goa,403001,1,1,1",
            "05-03-2024,Goa,,403001,1,1,1",
            "05-03-2024,Goa,North Goa,403001,abc,1,1",
            "05-03-2024,Goa,North Goa,403001,-2,1,1",
            "not-a-date,Goa,North Goa,403001,1,1,1",
            "2024-03-06,Goa,South Goa,,2,2,2",
        ],
    )
}

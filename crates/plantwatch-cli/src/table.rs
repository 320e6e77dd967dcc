//! Plain-text rendering of pages and summaries for the terminal.

use std::fmt::Write as _;

use plantwatch_core::{
  page::Page,
  record::{DataSource, MergedRecord},
  summary::Summary,
};

const FACILITY_WIDTH: usize = 28;
const UNIT_WIDTH: usize = 8;
const FUEL_WIDTH: usize = 14;

/// Cut `s` to at most `width` characters, marking the cut with `~`.
fn fit(s: &str, width: usize) -> String {
  if s.chars().count() <= width {
    return s.to_string();
  }
  let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
  out.push('~');
  out
}

fn sources(record: &MergedRecord) -> String {
  record
    .data_sources
    .iter()
    .map(|s| match s {
      DataSource::Authoritative => "A",
      DataSource::Research => "R",
      DataSource::Manual => "M",
    })
    .collect::<Vec<_>>()
    .join("+")
}

fn delay(record: &MergedRecord) -> String {
  if record.indefinite_delay {
    "indefinite".to_string()
  } else if record.emergency_order {
    "emergency".to_string()
  } else if let Some(months) = record.delay_months {
    format!("+{months}mo")
  } else {
    String::new()
  }
}

pub fn render_page(page: &Page) -> String {
  let mut out = String::new();
  let _ = writeln!(
    out,
    "{:<10}  {:<FACILITY_WIDTH$}  {:<UNIT_WIDTH$}  {:<2}  {:<FUEL_WIDTH$}  {:>7}  {:<10}  {}",
    "RETIRES", "FACILITY", "UNIT", "ST", "FUEL", "MW", "DELAY", "SOURCES",
  );

  for r in &page.data {
    let date = r
      .resolved_planned_date
      .map(|d| d.to_string())
      .unwrap_or_else(|| "unknown".to_string());
    let mw = r.capacity_mw.map(|c| format!("{c:.0}")).unwrap_or_default();
    let _ = writeln!(
      out,
      "{:<10}  {:<FACILITY_WIDTH$}  {:<UNIT_WIDTH$}  {:<2}  {:<FUEL_WIDTH$}  {:>7}  {:<10}  {}",
      date,
      fit(&r.facility_name, FACILITY_WIDTH),
      fit(&r.generator_id, UNIT_WIDTH),
      r.state,
      fit(&r.fuel_type, FUEL_WIDTH),
      mw,
      delay(r),
      sources(r),
    );
  }

  let p = &page.pagination;
  let _ = writeln!(
    out,
    "page {} of {} ({} records)",
    p.page,
    p.total_pages.max(1),
    p.total
  );
  out
}

pub fn render_summary(summary: &Summary) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "units tracked     {}", summary.total);
  let _ = writeln!(out, "capacity (MW)     {:.0}", summary.total_capacity_mw);
  let _ = writeln!(out, "extended          {}", summary.extended);
  let _ = writeln!(out, "indefinite        {}", summary.indefinite);
  let _ = writeln!(out, "emergency orders  {}", summary.emergency_orders);
  let _ = writeln!(
    out,
    "sources           authoritative {}, research {}, manual {}",
    summary.by_source.authoritative, summary.by_source.research, summary.by_source.manual,
  );
  let _ = writeln!(out, "by year");
  for (year, count) in &summary.by_year {
    let _ = writeln!(out, "  {year}  {count}");
  }
  if summary.undated > 0 {
    let _ = writeln!(out, "  ----  {}", summary.undated);
  }
  out
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use chrono::NaiveDate;
  use plantwatch_core::{page::paginate, summary::summarize};

  use super::*;

  fn record(name: &str, year: Option<i32>) -> MergedRecord {
    MergedRecord {
      facility_id:           Some(3),
      facility_name:         name.into(),
      generator_id:          "4".into(),
      unit_name:             None,
      research_slug:         None,
      state:                 "AL".into(),
      county:                None,
      city:                  None,
      latitude:              None,
      longitude:             None,
      capacity_mw:           Some(404.4),
      fuel_type:             "Coal".into(),
      operational_status:    Some("OP".into()),
      owner:                 None,
      operator:              None,
      data_sources:          BTreeSet::from([DataSource::Authoritative, DataSource::Research]),
      resolved_planned_date: year.and_then(|y| NaiveDate::from_ymd_opt(y, 12, 31)),
      authoritative_date:    None,
      research_date:         None,
      delay_months:          Some(24),
      delay_years:           Some(2),
      original_planned_year: None,
      revised_planned_year:  None,
      indefinite_delay:      false,
      emergency_order:       false,
      extended:              true,
      citation_source:       None,
      citation_url:          None,
    }
  }

  #[test]
  fn long_names_are_cut() {
    assert_eq!(fit("Barry", 8), "Barry");
    assert_eq!(fit("James M Barry Electric", 8), "James M~");
  }

  #[test]
  fn page_rows_show_date_delay_and_sources() {
    let page = paginate(vec![record("Barry", Some(2030))], 1, 50);
    let text = render_page(&page);
    let row = text.lines().nth(1).unwrap();
    assert!(row.starts_with("2030-12-31"));
    assert!(row.contains("+24mo"));
    assert!(row.ends_with("A+R"));
    assert!(text.ends_with("page 1 of 1 (1 records)\n"));
  }

  #[test]
  fn unknown_date_is_labelled() {
    let page = paginate(vec![record("Barry", None)], 1, 50);
    assert!(render_page(&page).lines().nth(1).unwrap().starts_with("unknown"));
  }

  #[test]
  fn empty_page_still_renders_footer() {
    let text = render_page(&Page::empty(1, 50));
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("page 1 of 1 (0 records)"));
  }

  #[test]
  fn summary_lists_years_in_order() {
    let summary = summarize(&[
      record("Gaston", Some(2035)),
      record("Barry", Some(2030)),
      record("Colbert", None),
    ]);
    let text = render_summary(&summary);
    let years: Vec<_> = text.lines().skip_while(|l| *l != "by year").skip(1).collect();
    assert_eq!(years, ["  2030  1", "  2035  1", "  ----  1"]);
  }
}

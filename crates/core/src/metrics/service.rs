//! Metrics aggregation service.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::document::types::{DocumentStatus, DocumentType, Flow};
use crate::metrics::error::MetricsError;
use crate::metrics::types::{
    ChartBucket, ChartGranularity, DateRange, DocumentCounts, DocumentFacts, FinancialSummary,
    MetricsReport, StatusDistribution, VatSummary,
};
use crate::review::types::ReviewLevel;

/// Ranges up to this many days chart with daily buckets.
const DAILY_CHART_MAX_DAYS: i64 = 31;

/// Service computing all rollups in a single pass over the document set.
pub struct MetricsService;

impl MetricsService {
    /// Aggregates counts, financials, VAT, chart series, and status
    /// distribution for the given documents.
    ///
    /// The documents are expected to be tenant-scoped already. When a
    /// range is supplied, documents without an issue date (or dated
    /// outside the range) are excluded from every rollup.
    ///
    /// Financial rollups cover approved invoices and corrected invoices
    /// only. The contribution of a corrected invoice is signed by flow:
    /// income corrections subtract, expense corrections add.
    ///
    /// # Errors
    ///
    /// Never fails today; the `Result` keeps the signature stable for
    /// range-validation callers constructing `DateRange` inline.
    pub fn aggregate(
        documents: &[DocumentFacts],
        range: Option<DateRange>,
    ) -> Result<MetricsReport, MetricsError> {
        let granularity = match range {
            Some(r) if r.days() <= DAILY_CHART_MAX_DAYS => ChartGranularity::Daily,
            _ => ChartGranularity::Monthly,
        };

        let mut counts = DocumentCounts::default();
        let mut financials = FinancialSummary::default();
        let mut distribution = StatusDistribution::default();
        let mut confidence_sum = Decimal::ZERO;
        let mut buckets: BTreeMap<NaiveDate, ChartBucket> = BTreeMap::new();

        for doc in documents {
            if let Some(r) = range {
                match doc.issue_date {
                    Some(date) if r.contains(date) => {}
                    _ => continue,
                }
            }

            counts.total += 1;
            match doc.status {
                DocumentStatus::Pending => {
                    counts.pending += 1;
                    distribution.pending += 1;
                }
                DocumentStatus::Rejected => {
                    counts.rejected += 1;
                    distribution.rejected += 1;
                }
                DocumentStatus::Approved => {
                    counts.approved += 1;
                    confidence_sum += doc.overall_confidence.unwrap_or(Decimal::ZERO);
                    if doc.is_auto_approved {
                        counts.auto_approved += 1;
                        distribution.auto_approved += 1;
                    } else {
                        counts.manually_approved += 1;
                        distribution.manual_approved += 1;
                    }
                }
            }
            if doc.review_level == ReviewLevel::Manual {
                counts.manual_review_count += 1;
            }

            if let Some(sign) = financial_sign(doc) {
                let base = sign * doc.base_amount.unwrap_or(Decimal::ZERO);
                let tax = sign * doc.tax_amount.unwrap_or(Decimal::ZERO);
                let total = sign * doc.total_amount.unwrap_or(Decimal::ZERO);

                match doc.flow {
                    Flow::In => {
                        financials.income_base += base;
                        financials.income_tax += tax;
                        financials.income_total += total;
                    }
                    Flow::Out => {
                        financials.expense_base += base;
                        financials.expense_tax += tax;
                        financials.expense_total += total;
                    }
                    // financial_sign already excludes unknown flow
                    Flow::Unknown => {}
                }

                if let Some(date) = doc.issue_date {
                    let period = bucket_key(date, granularity);
                    let bucket = buckets.entry(period).or_insert_with(|| ChartBucket {
                        period,
                        income_base: Decimal::ZERO,
                        expense_base: Decimal::ZERO,
                    });
                    match doc.flow {
                        Flow::In => bucket.income_base += base,
                        Flow::Out => bucket.expense_base += base,
                        Flow::Unknown => {}
                    }
                }
            }
        }

        counts.approval_rate = percentage(counts.approved, counts.total);
        counts.average_confidence = if counts.approved > 0 {
            (confidence_sum / Decimal::from(counts.approved)).round_dp(4)
        } else {
            Decimal::ZERO
        };

        financials.profit = financials.income_base - financials.expense_base;
        financials.profit_margin = if financials.income_base > Decimal::ZERO {
            (financials.profit / financials.income_base * Decimal::ONE_HUNDRED).round_dp(2)
        } else {
            Decimal::ZERO
        };

        let vat = VatSummary {
            collected: financials.income_tax,
            paid: financials.expense_tax,
            balance: financials.income_tax - financials.expense_tax,
        };

        Ok(MetricsReport {
            counts,
            financials,
            vat,
            chart: buckets.into_values().collect(),
            granularity,
            status_distribution: distribution,
        })
    }
}

/// Signed contribution factor, or `None` when the document does not
/// enter the financial rollups at all.
///
/// Only approved invoices and corrected invoices with a known flow count.
/// Corrected invoices are asymmetric by flow: an income correction
/// subtracts, an expense correction adds.
fn financial_sign(doc: &DocumentFacts) -> Option<Decimal> {
    if doc.status != DocumentStatus::Approved
        || !doc.document_type.is_financial()
        || doc.flow == Flow::Unknown
    {
        return None;
    }
    match (doc.document_type, doc.flow) {
        (DocumentType::CorrectedInvoice, Flow::In) => Some(Decimal::NEGATIVE_ONE),
        _ => Some(Decimal::ONE),
    }
}

fn bucket_key(date: NaiveDate, granularity: ChartGranularity) -> NaiveDate {
    match granularity {
        ChartGranularity::Daily => date,
        ChartGranularity::Monthly => date.with_day(1).unwrap_or(date),
    }
}

fn percentage(part: u64, whole: u64) -> Decimal {
    if whole == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(part) / Decimal::from(whole) * Decimal::ONE_HUNDRED).round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn doc(
        document_type: DocumentType,
        status: DocumentStatus,
        flow: Flow,
        base: Decimal,
        issue_date: NaiveDate,
    ) -> DocumentFacts {
        DocumentFacts {
            document_type,
            status,
            flow,
            review_level: ReviewLevel::Recommended,
            is_auto_approved: false,
            issue_date: Some(issue_date),
            base_amount: Some(base),
            tax_amount: Some((base * dec!(0.21)).round_dp(2)),
            total_amount: Some((base * dec!(1.21)).round_dp(2)),
            overall_confidence: Some(dec!(0.85)),
        }
    }

    fn approved_invoice(flow: Flow, base: Decimal, issue_date: NaiveDate) -> DocumentFacts {
        doc(
            DocumentType::Invoice,
            DocumentStatus::Approved,
            flow,
            base,
            issue_date,
        )
    }

    fn approved_correction(flow: Flow, base: Decimal, issue_date: NaiveDate) -> DocumentFacts {
        doc(
            DocumentType::CorrectedInvoice,
            DocumentStatus::Approved,
            flow,
            base,
            issue_date,
        )
    }

    #[test]
    fn test_income_correction_subtracts() {
        let docs = vec![
            approved_invoice(Flow::In, dec!(1000), date(2026, 1, 10)),
            approved_correction(Flow::In, dec!(200), date(2026, 1, 20)),
        ];
        let report = MetricsService::aggregate(&docs, None).unwrap();
        assert_eq!(report.financials.income_base, dec!(800));
    }

    #[test]
    fn test_expense_correction_adds() {
        let docs = vec![
            approved_invoice(Flow::Out, dec!(500), date(2026, 1, 10)),
            approved_correction(Flow::Out, dec!(100), date(2026, 1, 20)),
        ];
        let report = MetricsService::aggregate(&docs, None).unwrap();
        assert_eq!(report.financials.expense_base, dec!(600));
    }

    #[test]
    fn test_delivery_notes_never_contribute() {
        let docs = vec![
            approved_invoice(Flow::In, dec!(1000), date(2026, 1, 10)),
            doc(
                DocumentType::Delivery,
                DocumentStatus::Approved,
                Flow::In,
                dec!(9999),
                date(2026, 1, 11),
            ),
        ];
        let report = MetricsService::aggregate(&docs, None).unwrap();
        assert_eq!(report.financials.income_base, dec!(1000));
        // But the delivery note still counts.
        assert_eq!(report.counts.total, 2);
    }

    #[test]
    fn test_only_approved_documents_contribute_financially() {
        let docs = vec![
            approved_invoice(Flow::In, dec!(1000), date(2026, 1, 10)),
            doc(
                DocumentType::Invoice,
                DocumentStatus::Pending,
                Flow::In,
                dec!(500),
                date(2026, 1, 11),
            ),
            doc(
                DocumentType::Invoice,
                DocumentStatus::Rejected,
                Flow::In,
                dec!(300),
                date(2026, 1, 12),
            ),
        ];
        let report = MetricsService::aggregate(&docs, None).unwrap();
        assert_eq!(report.financials.income_base, dec!(1000));
        assert_eq!(report.counts.pending, 1);
        assert_eq!(report.counts.rejected, 1);
    }

    #[test]
    fn test_unknown_flow_is_excluded_from_financials() {
        let docs = vec![approved_invoice(Flow::Unknown, dec!(1000), date(2026, 1, 10))];
        let report = MetricsService::aggregate(&docs, None).unwrap();
        assert_eq!(report.financials.income_base, Decimal::ZERO);
        assert_eq!(report.financials.expense_base, Decimal::ZERO);
        assert_eq!(report.counts.approved, 1);
    }

    #[test]
    fn test_vat_and_profit_rollups() {
        let docs = vec![
            approved_invoice(Flow::In, dec!(1000), date(2026, 1, 10)),
            approved_invoice(Flow::Out, dec!(400), date(2026, 1, 15)),
        ];
        let report = MetricsService::aggregate(&docs, None).unwrap();

        assert_eq!(report.vat.collected, dec!(210.00));
        assert_eq!(report.vat.paid, dec!(84.00));
        assert_eq!(report.vat.balance, dec!(126.00));

        assert_eq!(report.financials.profit, dec!(600));
        assert_eq!(report.financials.profit_margin, dec!(60.00));
    }

    #[test]
    fn test_profit_margin_zero_without_income() {
        let docs = vec![approved_invoice(Flow::Out, dec!(400), date(2026, 1, 15))];
        let report = MetricsService::aggregate(&docs, None).unwrap();
        assert_eq!(report.financials.profit, dec!(-400));
        assert_eq!(report.financials.profit_margin, Decimal::ZERO);
    }

    #[test]
    fn test_counts_and_approval_rate() {
        let mut auto = approved_invoice(Flow::In, dec!(100), date(2026, 1, 5));
        auto.is_auto_approved = true;
        auto.overall_confidence = Some(dec!(0.95));

        let docs = vec![
            auto,
            approved_invoice(Flow::In, dec!(100), date(2026, 1, 6)),
            doc(
                DocumentType::Invoice,
                DocumentStatus::Pending,
                Flow::In,
                dec!(50),
                date(2026, 1, 7),
            ),
            doc(
                DocumentType::Invoice,
                DocumentStatus::Rejected,
                Flow::In,
                dec!(50),
                date(2026, 1, 8),
            ),
        ];
        let report = MetricsService::aggregate(&docs, None).unwrap();

        assert_eq!(report.counts.total, 4);
        assert_eq!(report.counts.approved, 2);
        assert_eq!(report.counts.auto_approved, 1);
        assert_eq!(report.counts.manually_approved, 1);
        assert_eq!(report.counts.approval_rate, dec!(50.00));
        // (0.95 + 0.85) / 2
        assert_eq!(report.counts.average_confidence, dec!(0.9000));

        assert_eq!(report.status_distribution.auto_approved, 1);
        assert_eq!(report.status_distribution.manual_approved, 1);
        assert_eq!(report.status_distribution.pending, 1);
        assert_eq!(report.status_distribution.rejected, 1);
    }

    #[test]
    fn test_manual_review_count() {
        let mut edited = doc(
            DocumentType::Invoice,
            DocumentStatus::Pending,
            Flow::In,
            dec!(100),
            date(2026, 1, 5),
        );
        edited.review_level = ReviewLevel::Manual;

        let docs = vec![edited, approved_invoice(Flow::In, dec!(100), date(2026, 1, 6))];
        let report = MetricsService::aggregate(&docs, None).unwrap();
        assert_eq!(report.counts.manual_review_count, 1);
    }

    #[test]
    fn test_short_range_charts_daily() {
        let range = DateRange::new(date(2026, 1, 1), date(2026, 1, 31)).unwrap();
        let docs = vec![
            approved_invoice(Flow::In, dec!(100), date(2026, 1, 5)),
            approved_invoice(Flow::In, dec!(50), date(2026, 1, 5)),
            approved_invoice(Flow::Out, dec!(30), date(2026, 1, 9)),
        ];
        let report = MetricsService::aggregate(&docs, Some(range)).unwrap();

        assert_eq!(report.granularity, ChartGranularity::Daily);
        assert_eq!(report.chart.len(), 2);
        assert_eq!(report.chart[0].period, date(2026, 1, 5));
        assert_eq!(report.chart[0].income_base, dec!(150));
        assert_eq!(report.chart[1].period, date(2026, 1, 9));
        assert_eq!(report.chart[1].expense_base, dec!(30));
    }

    #[test]
    fn test_long_range_charts_monthly() {
        let range = DateRange::new(date(2026, 1, 1), date(2026, 3, 31)).unwrap();
        let docs = vec![
            approved_invoice(Flow::In, dec!(100), date(2026, 1, 5)),
            approved_invoice(Flow::In, dec!(200), date(2026, 1, 25)),
            approved_correction(Flow::In, dec!(50), date(2026, 2, 10)),
        ];
        let report = MetricsService::aggregate(&docs, Some(range)).unwrap();

        assert_eq!(report.granularity, ChartGranularity::Monthly);
        assert_eq!(report.chart.len(), 2);
        assert_eq!(report.chart[0].period, date(2026, 1, 1));
        assert_eq!(report.chart[0].income_base, dec!(300));
        // The February correction charts as a negative income bucket.
        assert_eq!(report.chart[1].period, date(2026, 2, 1));
        assert_eq!(report.chart[1].income_base, dec!(-50));
    }

    #[test]
    fn test_range_filter_excludes_out_of_range_and_undated() {
        let range = DateRange::new(date(2026, 1, 1), date(2026, 1, 31)).unwrap();
        let mut undated = approved_invoice(Flow::In, dec!(100), date(2026, 1, 5));
        undated.issue_date = None;

        let docs = vec![
            approved_invoice(Flow::In, dec!(100), date(2026, 1, 5)),
            approved_invoice(Flow::In, dec!(100), date(2026, 2, 5)),
            undated,
        ];
        let report = MetricsService::aggregate(&docs, Some(range)).unwrap();
        assert_eq!(report.counts.total, 1);
        assert_eq!(report.financials.income_base, dec!(100));
    }

    #[test]
    fn test_empty_set_yields_zeroes() {
        let report = MetricsService::aggregate(&[], None).unwrap();
        assert_eq!(report.counts.total, 0);
        assert_eq!(report.counts.approval_rate, Decimal::ZERO);
        assert_eq!(report.counts.average_confidence, Decimal::ZERO);
        assert_eq!(report.financials, FinancialSummary::default());
        assert!(report.chart.is_empty());
    }
}

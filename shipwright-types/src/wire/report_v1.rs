use serde::{Deserialize, Serialize};

use crate::report::{
    ReportArtifacts, ReportFinding, ReportRunInfo, ReportToolInfo, ReportVerdict, ShipwrightReport,
};

/// Schema-exact wire representation of shipwright.report.v1.
///
/// The report's internal model is already schema-exact (tool version is
/// mandatory there), so this is a straight mirror kept for symmetry with
/// the plan wire type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportV1 {
    pub schema: String,
    pub tool: ReportToolInfo,
    pub run: ReportRunInfo,
    pub verdict: ReportVerdict,

    #[serde(default)]
    pub findings: Vec<ReportFinding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<ReportArtifacts>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl From<&ShipwrightReport> for ReportV1 {
    fn from(report: &ShipwrightReport) -> Self {
        Self {
            schema: report.schema.clone(),
            tool: report.tool.clone(),
            run: report.run.clone(),
            verdict: report.verdict.clone(),
            findings: report.findings.clone(),
            artifacts: report.artifacts.clone(),
            data: report.data.clone(),
        }
    }
}

impl From<ReportV1> for ShipwrightReport {
    fn from(report: ReportV1) -> Self {
        ShipwrightReport {
            schema: report.schema,
            tool: report.tool,
            run: report.run,
            verdict: report.verdict,
            findings: report.findings,
            artifacts: report.artifacts,
            data: report.data,
        }
    }
}

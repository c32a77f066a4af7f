use std::fmt;

/// Spend divided by lead count; `0.0` when there are no leads.
pub fn cost_per_lead(total_leads: usize, total_spend: f64) -> f64 {
    if total_leads == 0 {
        0.0
    } else {
        total_spend / total_leads as f64
    }
}

/// Spend, surviving leads and the derived cost per lead for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeadMetrics {
    pub total_spend: f64,
    pub total_leads: usize,
    pub cost_per_lead: f64,
}

impl LeadMetrics {
    pub fn compute(total_leads: usize, total_spend: f64) -> Self {
        Self {
            total_spend,
            total_leads,
            cost_per_lead: cost_per_lead(total_leads, total_spend),
        }
    }
}

impl fmt::Display for LeadMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total Spend: {:.2}, Total Leads: {}, Cost per Lead: {:.2}",
            self.total_spend, self.total_leads, self.cost_per_lead
        )
    }
}

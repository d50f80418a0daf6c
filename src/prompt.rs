//! The analysis prompt sent to the generation backend.
//!
//! The template is the output contract for the model: seven sections in a
//! fixed order. Any wording change is a breaking change to the report format
//! and must bump [`PROMPT_VERSION`].

/// Version of [`ANALYSIS_TEMPLATE`].
pub const PROMPT_VERSION: &str = "esg-analysis/1";

/// Where the extracted report text goes.
pub const PLACEHOLDER: &str = "{pdf_content}";

pub const ANALYSIS_TEMPLATE: &str = r#"
You are a Green Finance expert tasked with analyzing and evaluating multiple project reports for green finance investments.
The goal is to evaluate, prioritize, and allocate resources to projects that have the highest Environmental, Social, and Governance (ESG) impact while predicting future risks using the content from the uploaded project report.

The Content of the report:
{pdf_content}

The output structure should be like:
(Strictly don’t deviate from the given output structure)

1. Project Information: (Use Proper tables to display data)
- Project Name
- Location
- Expected Carbon Savings
- Budget Allocation
- ROI (Return on Investment)

2. ESG Scores: (Use tables to display data)
- Environmental Score (E): Extract information related to the environmental impact of the project, including carbon savings, renewable energy generation, resource conservation, etc.
                            Carbon Savings,Renewable Energy Generation,Resource Conservation,Biodiversity Impact
- Social Score (S): Extract details about the social impact, such as job creation, community benefits, stakeholder engagement, etc.
                      Job Creation,Community Development,Stakeholder Engagement,Access to Services
- Governance Score (G): Extract information about the governance structure, policies, ethical standards, and compliance with regulations.
                          Regulatory Compliance,Ethical Standards,Corporate Governance

3. Overall ESG Score: (Use tables to display data)
- Calculate the Overall ESG Score for each project by averaging the Environmental, Social, and Governance scores.
- Overall ESG Score = (Environmental Score + Social Score + Governance Score) / 3
- Provide this score as a metric for overall sustainability evaluation.

4. Risk Assessment:
For each project, identify the following risks:
- Environmental Risks: Potential environmental risks such as climate-related impacts (e.g., droughts, storms).
- Financial Risks: Assess financial risks like cost overruns, ROI predictions, and budget constraints.
- Operational Risks: Operational challenges, such as construction delays, resource shortages, or regulatory hurdles.

5. Optimization Recommendations:
Based on the extracted ESG scores, overall ESG score, and risk assessments, provide recommendations for allocating resources. Consider the following factors:
- Maximizing ESG impact: Prioritize projects with high ESG impact (Environmental, Social, Governance).
- Minimizing risks: Avoid projects with high financial or operational risks.
- Budget Constraints: If a budget is provided, ensure that resource allocation stays within the total available budget.

6. Conclusion:
- Provide an overall summary and recommendations on the best investment strategy to maximize ESG impact.
Score projects based on their sustainability impact Optimize resource allocation across
multiple projects to maximize ESG outcomes while staying within budget constraints.
2. Predict future risks associated with green investments
3. Evaluate, prioritize, and optimizes green finance
investments, helping banks and financial institutions allocate capital to the most impactful and
sustainable projects.

7. Final Suggestion
As an expert give a suggestion whether this project has a good ESG Score and can other organizations provide fund for this project.

"#;

/// Substitute the report text into the template.
///
/// Only the template's own placeholder is replaced, so text that happens to
/// contain `{pdf_content}` is embedded untouched.
pub fn render(report_text: &str) -> String {
    ANALYSIS_TEMPLATE.replacen(PLACEHOLDER, report_text, 1)
}

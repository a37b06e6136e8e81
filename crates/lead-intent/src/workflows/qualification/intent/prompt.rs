use std::fmt::Write;

use crate::workflows::qualification::domain::{Lead, Offer};

const TASK: &str = "You are an expert B2B lead qualification analyst. Analyze the provided lead \
against the given product/offer and classify their buying intent.";

const CLASSIFICATION_CRITERIA: &str = "<classification_criteria>
<high_intent>
- Decision maker role (CEO, CTO, CFO, Founder, Director, Head, Manager, VP)
- Industry closely matches product's ideal use cases
- LinkedIn bio shows relevant pain points or interests
- Company size/stage fits the product
</high_intent>

<medium_intent>
- Influencer role (Senior, Lead, Specialist, Analyst, Coordinator)
- Adjacent industry or some relevance to use cases
- Some indicators of potential interest but not strong
</medium_intent>

<low_intent>
- Individual contributor or unrelated role
- Industry doesn't match product use cases
- No clear indicators of interest or need
</low_intent>
</classification_criteria>";

const INSTRUCTIONS: &str = "<instructions>
1. Analyze the lead against the classification criteria
2. Consider role authority, industry fit, and bio relevance
3. Classify as High, Medium, or Low intent
4. Provide 1-2 sentences explaining your reasoning
5. Focus on specific factors that influenced your decision
</instructions>";

const OUTPUT_FORMAT: &str = r#"<output_format>
Respond with only a JSON object in this exact format:
{
  "intent": "High|Medium|Low",
  "reasoning": "Specific explanation in 1-2 sentences focusing on key qualifying factors"
}
</output_format>"#;

/// Render the XML-tagged classification prompt for one lead.
pub fn build_prompt(lead: &Lead, offer: &Offer) -> String {
    let mut prompt = String::with_capacity(2048);

    // Writing into a String cannot fail.
    let _ = writeln!(prompt, "<task>\n{TASK}\n</task>\n");

    prompt.push_str("<context>\n<product>\n");
    let _ = writeln!(prompt, "  <name>{}</name>", offer.name);
    prompt.push_str("  <value_propositions>\n");
    for value_prop in &offer.value_props {
        let _ = writeln!(prompt, "    <value_prop>{value_prop}</value_prop>");
    }
    prompt.push_str("  </value_propositions>\n  <ideal_use_cases>\n");
    for use_case in &offer.ideal_use_cases {
        let _ = writeln!(prompt, "    <use_case>{use_case}</use_case>");
    }
    prompt.push_str("  </ideal_use_cases>\n</product>\n\n<lead_profile>\n");

    let fields = [
        ("name", &lead.name),
        ("role", &lead.role),
        ("company", &lead.company),
        ("industry", &lead.industry),
        ("location", &lead.location),
        ("linkedin_bio", &lead.linkedin_bio),
    ];
    for (tag, value) in fields {
        let _ = writeln!(prompt, "  <{tag}>{value}</{tag}>");
    }
    prompt.push_str("</lead_profile>\n</context>\n\n");

    prompt.push_str(CLASSIFICATION_CRITERIA);
    prompt.push_str("\n\n");
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str("\n\n");
    prompt.push_str(OUTPUT_FORMAT);
    prompt
}

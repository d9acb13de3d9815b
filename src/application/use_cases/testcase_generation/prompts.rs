/// Fixed output contract for the model. The table parser relies on every
/// line of it, so it is sent in full on each request.
pub(crate) const TEST_CASE_INSTRUCTIONS: &str = concat!(
    "Read the uploaded Software Requirements Specification (SRS.docx).\n",
    "You MUST output exactly two parts in this order:\n",
    "1) A single line in the exact format:\n",
    "   Component: <detected overall component/module/system name from the SRS>\n",
    "   (Put only this line first. No code fences, no extra text before it.)\n",
    "2) A blank line, followed immediately by a single markdown table of test cases.\n\n",
    "⚠️ IMPORTANT: Generate the **maximum possible coverage of test cases** from the SRS.\n",
    "- Include **all functional test cases** (for every requirement, feature, rule, and exception).\n",
    "- Include **all non-functional test cases**:\n",
    "  • Performance\n",
    "  • Usability\n",
    "  • Security\n",
    "  • Reliability\n",
    "  • Compatibility\n",
    "  • Accessibility\n",
    "  • Compliance\n",
    "  • Installation\n",
    "  • Recovery\n",
    "- Include **negative test cases** (invalid inputs, boundary conditions, failure handling).\n",
    "- Include **edge cases, stress cases, and corner cases**.\n",
    "- Include **ad-hoc / exploratory test cases**.\n",
    "- Include **data validation test cases**.\n",
    "- Include **integration test cases**.\n",
    "- Include **regression test cases**.\n",
    "- Include **accessibility test cases**.\n",
    "- Do not skip any scenario implied in the SRS.\n\n",
    "🚨 MANDATORY REQUIREMENT:\n",
    "- You MUST include a **separate set of test cases dedicated to IPv4 and IPv6**.\n",
    "- Cover IPv4 only, IPv6 only, dual-stack, fallback, invalid IPs,\n",
    "  performance comparison and security scenarios.\n\n",
    "✅ You MUST generate **at least 200 test cases** if the SRS is moderately detailed.\n",
    "If the SRS is short, extrapolate plausible scenarios.\n\n",
    "Number test cases sequentially as `TC001`, `TC002`, etc.\n",
    "All test cases must be in ONE continuous markdown table.\n\n",
    "Return the markdown table with columns exactly named:\n",
    "`Test Case ID` | `Preconditions` | `Test Condition` | ",
    "`Steps with description` | `Expected Result` | ",
    "`Actual Result` | `Remarks`\n\n",
    "SRS Content:\n",
);

/// The SRS text goes last, verbatim.
pub(crate) fn build_test_case_prompt(srs_text: &str) -> String {
    let mut prompt = String::with_capacity(TEST_CASE_INSTRUCTIONS.len() + srs_text.len());
    prompt.push_str(TEST_CASE_INSTRUCTIONS);
    prompt.push_str(srs_text);
    prompt
}

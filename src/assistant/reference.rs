/// Background knowledge prepended to every prompt so answers stay grounded
/// in standard diabetes self-management guidance.
pub const MEDICAL_REFERENCE: &str = "\
Diabetes reference notes:

Blood glucose ranges (mg/dL):
- Fasting, no diabetes: 70-99. Prediabetes: 100-125. Diabetes: 126 or higher.
- Target for most adults with diabetes: 80-130 before meals, below 180 one to two hours after meals.
- Hypoglycemia: below 70. Severe hypoglycemia: below 54, requires immediate treatment.
- Hyperglycemia: above 180 after meals or persistently above 130 fasting.
- Rule of 15 for lows: take 15 g of fast-acting carbohydrate, recheck after 15 minutes.

Medication classes:
- Rapid-acting insulin (e.g. NovoRapid, Humalog): taken 15-20 minutes before meals to cover carbohydrates.
- Long-acting insulin (e.g. Lantus, Levemir): provides basal coverage over roughly 24 hours.
- Biguanides (e.g. Metformin): reduce hepatic glucose production; take with food to limit stomach upset.
- SGLT2 inhibitors, GLP-1 receptor agonists, DPP-4 inhibitors and sulfonylureas are common add-on therapies.

Complications of poorly controlled glucose:
- Cardiovascular disease and stroke.
- Neuropathy, especially in the feet.
- Retinopathy and vision loss.
- Nephropathy and chronic kidney disease.
- Diabetic ketoacidosis (mostly type 1) and hyperosmolar hyperglycemic state (mostly type 2).

Nutrition guidance:
- Pair carbohydrates with protein, fat or fiber to blunt glucose spikes.
- Prefer whole grains, legumes, vegetables and low glycemic index foods over refined carbohydrates.
- Keep carbohydrate portions consistent across days; watch sugary drinks.

Exercise guidance:
- Aim for 150 minutes of moderate activity per week; a 10-20 minute walk after meals lowers post-meal glucose.
- Check glucose before exercise if using insulin; carry fast-acting carbohydrate.
- Heat and dehydration can cause glucose fluctuations; stay hydrated.
";

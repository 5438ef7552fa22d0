//! Prompt template with `{context}` and `{question}` slots.

use std::path::Path;

use rag_store::Passage;

const CONTEXT_SLOT: &str = "{context}";
const QUESTION_SLOT: &str = "{question}";

/// Separator between passage texts inside `{context}`.
pub const PASSAGE_SEPARATOR: &str = "\n\n";

/// Built-in grant-writing instructions.
pub const HORIZON_EUROPE_TEMPLATE: &str = r#"
You are an AI assistant specialized in Horizon Europe grant writing, focusing on Research and Innovation Actions (RIAs) and Innovation Actions (IAs). Your role is to generate high-quality, structured responses using a **retrieval-augmented approach** based on the provided document context.

### **System Instructions:**
- Begin your response by providing the **whole call topic description** including:
  - Action type (RIA, IA or CSA)
  - Funding amount per action
  - Expected outcomes
  - Scope
  - Expected Impacts
- Retrieve the most relevant information from the provided context.
- Structure responses according to Horizon Europe's official proposal sections.
- If information is missing or unclear, acknowledge the limitation and suggest best practices.
- Use **bullet points, markdown formatting, and quantifiable indicators** where applicable.
- Cite specific sections or page numbers from the documents when possible.

### **Proposal Structure & Requirements:**
#### **1. Excellence**  
- Clearly define the project's **objectives and ambition**.  
- Address **state-of-the-art research, gaps, and innovation potential**.  
- Outline the **methodology**, including interdisciplinary, SSH, gender, and Open Science aspects.  
- Define the **TRL level** and explain how the project advances technological readiness.  

#### **2. Impact**  
- Develop a structured **impact pathway** linking expected outcomes to **societal, scientific, and economic benefits**.  
- Identify and **quantify key impact indicators** (e.g., CO2 reduction, jobs created, technology adoption).  
- Provide a strong **Dissemination, Exploitation, and Communication (DEC) plan**, detailing target groups and engagement strategies.  

#### **3. Implementation**  
- Structure a **work plan** with clear **work packages (WPs), deliverables, milestones, and effort distribution**.  
- Include **Gantt & PERT charts**, risk management strategies, and consortium capacity details.  
- Justify the budget and partner roles, ensuring alignment with Horizon Europe's funding expectations.  

---

### **Context:**  
{context}  

### **Question:**  
{question}  

### **Answer:**  
"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Context,
    Question,
}

/// Validated prompt template.
///
/// Each slot occurs exactly once in `body`; slot offsets are computed once
/// at construction so [`PromptTemplate::assemble`] is a single pass.
#[derive(Clone, Debug)]
pub struct PromptTemplate {
    name: String,
    body: String,
    /// `(byte offset, slot)` sorted by offset.
    slots: [(usize, Slot); 2],
}

impl PromptTemplate {
    /// # Errors
    /// `ContextorError::Template` if a slot is missing or repeated.
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Result<Self, crate::ContextorError> {
        let name = name.into();
        let body = body.into();

        let context_at = single_occurrence(&body, CONTEXT_SLOT, &name)?;
        let question_at = single_occurrence(&body, QUESTION_SLOT, &name)?;

        let mut slots = [(context_at, Slot::Context), (question_at, Slot::Question)];
        slots.sort_by_key(|(at, _)| *at);

        Ok(Self { name, body, slots })
    }

    /// The built-in Horizon Europe template.
    pub fn horizon_europe() -> Self {
        let body = HORIZON_EUROPE_TEMPLATE;
        let at = |slot: &str| body.find(slot).unwrap_or(body.len());
        let mut slots = [(at(CONTEXT_SLOT), Slot::Context), (at(QUESTION_SLOT), Slot::Question)];
        slots.sort_by_key(|(at, _)| *at);
        Self {
            name: "horizon-europe".into(),
            body: body.into(),
            slots,
        }
    }

    /// Loads a template body from a file; the name is the file stem.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, crate::ContextorError> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path)
            .map_err(|e| crate::ContextorError::Template(format!("{}: {e}", path.display())))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "custom".into());
        Self::new(name, body)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fills `{context}` with passage texts (retrieval order, blank-line
    /// separated) and `{question}` with the query verbatim.
    ///
    /// Slot markers inside the substituted values stay literal.
    ///
    /// # Example
    /// ```
    /// use contextor::PromptTemplate;
    /// use rag_store::Passage;
    ///
    /// let t = PromptTemplate::new("t", "C={context} Q={question}").unwrap();
    /// let p = t.assemble("why?", &[Passage::new("a", 0.9, 0), Passage::new("b", 0.8, 1)]);
    /// assert_eq!(p, "C=a\n\nb Q=why?");
    /// ```
    pub fn assemble(&self, question: &str, passages: &[Passage]) -> String {
        let context = passages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(PASSAGE_SEPARATOR);

        let mut out = String::with_capacity(self.body.len() + context.len() + question.len());
        let mut cursor = 0;
        for (at, slot) in self.slots {
            out.push_str(&self.body[cursor..at]);
            let (value, marker) = match slot {
                Slot::Context => (context.as_str(), CONTEXT_SLOT),
                Slot::Question => (question, QUESTION_SLOT),
            };
            out.push_str(value);
            cursor = at + marker.len();
        }
        out.push_str(&self.body[cursor..]);
        out
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::horizon_europe()
    }
}

fn single_occurrence(body: &str, marker: &str, name: &str) -> Result<usize, crate::ContextorError> {
    let mut hits = body.match_indices(marker).map(|(i, _)| i);
    match (hits.next(), hits.next()) {
        (Some(at), None) => Ok(at),
        (None, _) => Err(crate::ContextorError::Template(format!(
            "template '{name}' is missing the {marker} slot"
        ))),
        (Some(_), Some(_)) => Err(crate::ContextorError::Template(format!(
            "template '{name}' repeats the {marker} slot"
        ))),
    }
}

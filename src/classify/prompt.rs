//! Prompt construction for batch classification.
//!
//! The prompt is Spanish end to end because the response schema is
//! Spanish; mixing languages invites mixed-language answers. Documents
//! are numbered 1..n within the batch and the model is told to answer
//! with one array entry per document in the same order.

use crate::models::Document;

const RESPONSE_FORMAT: &str = r#"Responde ÚNICAMENTE con un array JSON válido, uno por cada documento en el mismo orden.
La estructura debe ser exactamente esta:
[
    {
        "documento": 1,
        "archivo": "nombre_del_archivo.pdf",
        "tema_general": "Categoría principal (ej: Ciencias, Tecnología, Historia, etc.)",
        "subtema": "Subcategoría específica",
        "tema_especifico": "Tema muy específico del contenido",
        "confianza": "alta|media|baja",
        "palabras_clave": ["palabra1", "palabra2", "palabra3"]
    }
]

Asegúrate de que el JSON sea válido y sin texto adicional."#;

/// Builds the classification prompt for one batch of documents.
pub struct PromptBuilder<'a> {
    documents: &'a [Document],
}

impl<'a> PromptBuilder<'a> {
    pub fn new(documents: &'a [Document]) -> Self {
        Self { documents }
    }

    /// Render the full prompt: instructions, one block per document,
    /// then the required response format.
    pub fn build(&self) -> String {
        let mut prompt = format!(
            "Analiza los {} textos de documentos PDF que te proporciono a continuación.\n\
             Para cada uno, clasifícalo en una jerarquía temática de 3 niveles, \
             considerando que son libros o documentos académicos/técnicos.\n\n",
            self.documents.len()
        );

        for (i, document) in self.documents.iter().enumerate() {
            prompt.push_str(&format!(
                "--- DOCUMENTO {} (Archivo: {}) ---\n{}\n\n",
                i + 1,
                document.filename,
                document.text
            ));
        }

        prompt.push_str(RESPONSE_FORMAT);
        prompt
    }
}

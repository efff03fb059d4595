//! Suggested reply templates

use mailsort_core::{Category, ReplyBundle};

const PRODUCTIVE_SUBJECT: &str = "Re: Sua solicitação";

const PRODUCTIVE_BODY: &str = "Olá!\n\n\
Recebemos sua mensagem e já estamos analisando. Para agilizar, poderia confirmar:\n\
- Número do chamado/protocolo (se houver)\n\
- Descrição breve do problema/solicitação\n\
- Anexos relevantes (prints, documentos)\n\n\
Nosso SLA padrão para primeira resposta é de até 4 horas úteis.\n\
Ficamos à disposição.\n\n\
Atenciosamente,\nEquipe de Suporte";

const UNPRODUCTIVE_SUBJECT: &str = "Re: Mensagem recebida";

const UNPRODUCTIVE_BODY: &str = "Olá!\n\n\
Obrigado pela sua mensagem. Registramos seu contato.\n\
Se precisar de suporte ou acompanhamento de alguma solicitação, responda este email com os detalhes.\n\n\
Abraços,\nEquipe";

/// Suggested subject and body for a category
pub fn compose_reply(category: Category) -> ReplyBundle {
    match category {
        Category::Productive => ReplyBundle::new(PRODUCTIVE_SUBJECT, PRODUCTIVE_BODY),
        Category::Unproductive => ReplyBundle::new(UNPRODUCTIVE_SUBJECT, UNPRODUCTIVE_BODY),
    }
}

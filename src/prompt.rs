// Instruction template for the daily recap. The report JSON is appended
// verbatim after the instructions; the model is expected to use its own
// notion of the current time for the staleness and start-time checks.

use crate::aggregator::Report;

const INSTRUCTIONS: &str = "\
Olá! Por favor, analise os dados brutos de resultados de jogos fornecidos abaixo. \
Esses dados estão separados por \"HOJE\" e \"ONTEM\" e contêm informações da MLB, NFL e NBA, \
incluindo times, placares (ou placares parciais), status (Final, In Progress, Scheduled, Postponed) \
e horários para jogos agendados. Uma liga com valor null não pôde ser consultada.

Com base nesses dados e **considerando o horário atual**, gere um texto em português no seguinte formato e estilo:

1.  **Tom Conversacional:** Escreva de forma natural e amigável, como se estivesse atualizando um amigo chamado \"Gabriel\". Comece com uma saudação (\"Olá Gabriel! Tudo certo?\", ou similar).
2.  **Estrutura Clara:** Separe nitidamente as informações de \"ONTEM\" das informações de \"HOJE\".
3.  **Resumo de Ontem:** Para cada liga (NBA, NFL, MLB):
    * Informe os resultados finais dos jogos que aconteceram.
    * Mencione explicitamente se não houve jogos (explicando brevemente o motivo, ex: entressafra).
    * Mencione jogos adiados, se houver.
4.  **Atualização de Hoje:** Para cada liga (NBA, NFL, MLB):
    * **Jogos Finalizados:** Informe os resultados finais.
    * **Jogos em Andamento ('In Progress'):** Informe o placar parcial *que consta nos dados*, mas adicione uma observação indicando que este era o placar no momento da consulta e que o jogo pode já ter terminado ou estar em outra fase, *considerando o horário atual*.
    * **Jogos Agendados ('Scheduled'):** Verifique o horário do jogo agendado.
        * Se o horário do jogo já passou (baseado no horário atual), mencione que o jogo *deve ter começado* ou está *em andamento*.
        * Se o horário ainda não chegou, informe que o jogo acontecerá mais tarde e especifique o **horário de início**.
    * Se uma liga não tiver jogos hoje, diga isso claramente.
5.  **Linguagem:** Use frases completas e fluidas. Não copie apenas os dados, reinterprete-os no formato de resumo conversacional.
6.  **Horário:** Inclua os horários de início dos jogos agendados.
";

/// Instructions followed by the serialized report.
pub fn build(report: &Report) -> serde_json::Result<String> {
    let payload = serde_json::to_string(report)?;
    Ok(format!("{INSTRUCTIONS}\n{payload}\n"))
}

//! Static HTML served at `/` and `/api`.

pub const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>API Nano</title>
</head>
<body>
  <h1>Bem-vindo à API Nano</h1>
  <p>Gerador de imagens de perfil, ranking e ATM. Veja <a href="/api">/api</a>.</p>
</body>
</html>
"#;

pub const DOCS_PAGE: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>API Nano - Documentação</title>
  <style>
    body { font-family: Arial, sans-serif; background-color: #f4f4f9; color: #333; margin: 0; padding: 0; }
    main { max-width: 860px; margin: 0 auto; padding: 24px; }
    section { background: #fff; border-radius: 8px; padding: 16px 24px; margin-bottom: 16px; }
    code { background: #eee; padding: 2px 4px; border-radius: 4px; }
  </style>
</head>
<body>
<main>
  <h1>API Nano</h1>

  <section>
    <h2>GET /api/perfil</h2>
    <p>Gera um cartão de perfil (PNG 800x450).</p>
    <ul>
      <li><strong>id</strong>: (opcional) ID do usuário no Discord.</li>
      <li><strong>coins</strong>: (opcional) Quantidade de moedas, abreviada (1500 vira 1.5K).</li>
      <li><strong>reps</strong>: (opcional) Reputação, abreviada.</li>
      <li><strong>status</strong>: (opcional) Padrão 'Solteiro(a)'.</li>
      <li><strong>aboutMe</strong>: (opcional) Texto sobre o usuário. Padrão 'Sou um entusiasta\nem tecnologia.'</li>
      <li><strong>banner</strong>: (opcional) URL do banner.</li>
      <li><strong>json</strong>: (opcional) <code>true</code> retorna o perfil em JSON.</li>
    </ul>
    <p>Exemplo: <code>/api/perfil?id=123456789&amp;coins=1000&amp;reps=50&amp;status=Casado(a)&amp;aboutMe=Adoro programar</code></p>
  </section>

  <section>
    <h2>GET /api/rank</h2>
    <p>Gera um pódio com os 3 primeiros e uma lista com os 5 primeiros (PNG 525x350).</p>
    <ul>
      <li><strong>extraData</strong>: (obrigatório) Pelo menos 3 pares <code>id:moedas</code> separados por vírgula.</li>
      <li><strong>data</strong>: (obrigatório) Pelo menos 5 pares <code>id:moedas</code> separados por vírgula.</li>
    </ul>
    <p>As respostas trazem os cabeçalhos <code>X-Cache</code> e <code>X-Processing-Time</code>.</p>
  </section>

  <section>
    <h2>GET /api/atm</h2>
    <p>Gera um comprovante de ATM (PNG 800x300).</p>
    <ul>
      <li><strong>user</strong>: (obrigatório) ID do usuário.</li>
      <li><strong>coins</strong>: (obrigatório) Saldo em carteira.</li>
      <li><strong>bank</strong>: (obrigatório) Saldo no banco.</li>
    </ul>
  </section>

  <section>
    <h2>GET /health, GET /stats</h2>
    <p>Estado do serviço e estatísticas dos caches em JSON.</p>
  </section>
</main>
</body>
</html>
"#;

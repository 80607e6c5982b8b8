// src/services/pagamento_service.rs

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::Utc;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::UsuarioRepository,
    models::{
        pagamento::{CartaoCompleto, CriarPagamentoPayload, MetodoPagamento, PagamentoResponse},
        pedido::StatusPedido,
        usuario::Usuario,
        webhook::referencia_do_pedido,
    },
    services::{
        asaas::{AsaasClient, CartaoAsaas, CobrancaRequest, NovoClienteAsaas},
        pedido_service::PedidoService,
    },
};

const DIAS_VENCIMENTO: i64 = 3;

// Campos obrigatórios da solicitação de pagamento, já conferidos
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolicitacaoPagamento {
    pub pedido_id: i32,
    pub metodo: MetodoPagamento,
    pub cartao: Option<CartaoCompleto>,
}

pub fn validar_solicitacao(payload: &CriarPagamentoPayload) -> Result<SolicitacaoPagamento, AppError> {
    let (Some(pedido_id), Some(metodo)) = (payload.pedido_id, payload.metodo_pagamento) else {
        return Err(AppError::bad_request("pedidoId e metodoPagamento são obrigatórios."));
    };

    let cartao = match metodo {
        MetodoPagamento::CreditCard => Some(
            payload
                .cartao
                .as_ref()
                .and_then(|c| c.completo())
                .ok_or_else(|| AppError::bad_request("Dados do cartão incompletos."))?,
        ),
        _ => None,
    };

    Ok(SolicitacaoPagamento { pedido_id, metodo, cartao })
}

// Mapa usuário -> trava. Serializa o "busca ou cria cliente" no Asaas por usuário.
type TravasPorUsuario = Arc<Mutex<HashMap<i32, Arc<tokio::sync::Mutex<()>>>>>;

// Referência a uma trava do mapa. Ao ser solta, remove a entrada se ninguém
// mais a usa, para o mapa não crescer com um item por usuário que já pagou.
struct ReservaDeTrava {
    travas: TravasPorUsuario,
    usuario_id: i32,
    trava: Arc<tokio::sync::Mutex<()>>,
}

impl ReservaDeTrava {
    fn reservar(travas: &TravasPorUsuario, usuario_id: i32) -> Self {
        let trava = {
            let mut mapa = travas.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            mapa.entry(usuario_id).or_default().clone()
        };
        Self { travas: travas.clone(), usuario_id, trava }
    }
}

impl Drop for ReservaDeTrava {
    fn drop(&mut self) {
        let mut mapa = self.travas.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // Clones só saem do mapa com este mutex preso: 2 = o mapa e esta reserva
        if Arc::strong_count(&self.trava) == 2 {
            mapa.remove(&self.usuario_id);
        }
    }
}

#[derive(Clone)]
pub struct PagamentoService {
    pedido_service: PedidoService,
    usuario_repo: UsuarioRepository,
    asaas: AsaasClient,
    travas: TravasPorUsuario,
}

impl PagamentoService {
    pub fn new(pedido_service: PedidoService, usuario_repo: UsuarioRepository, asaas: AsaasClient) -> Self {
        Self {
            pedido_service,
            usuario_repo,
            asaas,
            travas: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn criar_pagamento(
        &self,
        usuario_id: i32,
        payload: &CriarPagamentoPayload,
    ) -> Result<PagamentoResponse, AppError> {
        let solicitacao = validar_solicitacao(payload)?;

        // 1. Pedido: existe, é do usuário e ainda está pendente
        let pedido = self
            .pedido_service
            .buscar_detalhado(solicitacao.pedido_id)
            .await?
            .ok_or_else(|| AppError::not_found("Pedido não encontrado."))?;

        if pedido.pedido.usuario_id != usuario_id {
            return Err(AppError::forbidden("Você não tem permissão para pagar este pedido."));
        }
        if pedido.pedido.status != StatusPedido::Pendente {
            return Err(AppError::bad_request("Pedido já processado."));
        }

        // 2. Total recalculado com os preços atuais, nunca vindo do cliente
        let total = pedido.total.round_dp(2);
        if total <= Decimal::ZERO {
            return Err(AppError::bad_request("Valor total inválido para pagamento."));
        }

        // 3. Dados do pagador
        let usuario = self
            .usuario_repo
            .find_by_id(usuario_id)
            .await?
            .ok_or_else(|| AppError::not_found("Usuário não encontrado."))?;

        if usuario.cpf.trim().is_empty() {
            return Err(AppError::bad_request("CPF não cadastrado. Adicione no perfil."));
        }

        // 4. Cliente no Asaas
        let cliente_id = self.garantir_cliente(&usuario).await?;

        // 5. Cobrança
        let cobranca = CobrancaRequest {
            customer: cliente_id,
            billing_type: solicitacao.metodo,
            due_date: Utc::now().date_naive() + chrono::Duration::days(DIAS_VENCIMENTO),
            value: total,
            description: format!("Pedido #{} - Pizzaria", solicitacao.pedido_id),
            external_reference: referencia_do_pedido(solicitacao.pedido_id),
            credit_card: solicitacao.cartao.map(|c| CartaoAsaas {
                holder_name: c.holder_name,
                number: c.number,
                expiry_month: c.expiry_month,
                expiry_year: c.expiry_year,
                ccv: c.cvv,
            }),
        };

        let criada = self.asaas.criar_cobranca(&cobranca).await?;
        tracing::info!(
            "💳 Cobrança {} criada para o pedido {} ({:?}, R$ {})",
            criada.id,
            solicitacao.pedido_id,
            solicitacao.metodo,
            total
        );

        // 6. PIX: QR Code e copia-e-cola. Falha aqui não desfaz a cobrança.
        let (pix_qr_code, pix_copia_cola) = if solicitacao.metodo == MetodoPagamento::Pix {
            match self.asaas.buscar_pix_qr_code(&criada.id).await {
                Ok(qr) => (qr.encoded_image, qr.payload),
                Err(e) => {
                    tracing::warn!("⚠️ Não foi possível obter o QR Code PIX de {}: {}", criada.id, e);
                    (None, None)
                }
            }
        } else {
            (None, None)
        };

        Ok(PagamentoResponse {
            payment_id: criada.id,
            link_pagamento: criada.invoice_url,
            pix_qr_code,
            pix_copia_cola,
            valor: total,
        })
    }

    // Busca o cliente pela referência externa (id local); se não achar, cria.
    async fn garantir_cliente(&self, usuario: &Usuario) -> Result<String, AppError> {
        // O guard cai antes da reserva (ordem inversa de declaração)
        let reserva = ReservaDeTrava::reservar(&self.travas, usuario.id);
        let _guard = reserva.trava.lock().await;

        let referencia = usuario.id.to_string();
        match self.asaas.buscar_cliente_por_referencia(&referencia).await {
            Ok(Some(cliente)) => return Ok(cliente.id),
            Ok(None) => {}
            Err(e) => tracing::warn!("⚠️ Busca de cliente no Asaas falhou, tentando criar: {}", e),
        }

        let cliente = self
            .asaas
            .criar_cliente(&NovoClienteAsaas {
                name: usuario.nome.clone(),
                email: usuario.email.clone(),
                cpf_cnpj: usuario.cpf.clone(),
                phone: usuario.telefone.clone(),
                external_reference: referencia,
            })
            .await?;

        tracing::info!("🏦 Cliente {} criado no Asaas para o usuário {}", cliente.id, usuario.id);
        Ok(cliente.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pagamento::CartaoPayload;

    fn travas_vazias() -> TravasPorUsuario {
        Arc::new(Mutex::new(HashMap::new()))
    }

    fn entradas(travas: &TravasPorUsuario) -> usize {
        travas.lock().unwrap().len()
    }

    #[test]
    fn trava_sai_do_mapa_quando_ninguem_mais_usa() {
        let travas = travas_vazias();

        let reserva = ReservaDeTrava::reservar(&travas, 7);
        assert_eq!(entradas(&travas), 1);
        drop(reserva);
        assert_eq!(entradas(&travas), 0);
    }

    #[test]
    fn trava_compartilhada_fica_ate_a_ultima_reserva() {
        let travas = travas_vazias();

        let primeira = ReservaDeTrava::reservar(&travas, 7);
        let segunda = ReservaDeTrava::reservar(&travas, 7);
        let outro_usuario = ReservaDeTrava::reservar(&travas, 8);
        assert!(Arc::ptr_eq(&primeira.trava, &segunda.trava));
        assert_eq!(entradas(&travas), 2);

        drop(primeira);
        assert_eq!(entradas(&travas), 2);
        drop(segunda);
        assert_eq!(entradas(&travas), 1);
        drop(outro_usuario);
        assert_eq!(entradas(&travas), 0);
    }

    #[tokio::test]
    async fn reserva_com_guard_preso_libera_na_ordem_certa() {
        let travas = travas_vazias();
        {
            let reserva = ReservaDeTrava::reservar(&travas, 3);
            let _guard = reserva.trava.lock().await;
            assert_eq!(entradas(&travas), 1);
        }
        assert_eq!(entradas(&travas), 0);
    }

    fn payload(pedido_id: Option<i32>, metodo: Option<MetodoPagamento>, cartao: Option<CartaoPayload>) -> CriarPagamentoPayload {
        CriarPagamentoPayload { pedido_id, metodo_pagamento: metodo, cartao }
    }

    fn cartao_completo() -> CartaoPayload {
        CartaoPayload {
            holder_name: Some("MARIA L SILVA".into()),
            number: Some("5162306219378829".into()),
            expiry_month: Some("05".into()),
            expiry_year: Some("2030".into()),
            cvv: Some("318".into()),
        }
    }

    #[test]
    fn campos_obrigatorios() {
        for p in [
            payload(None, Some(MetodoPagamento::Pix), None),
            payload(Some(1), None, None),
        ] {
            match validar_solicitacao(&p) {
                Err(AppError::BadRequest(msg)) => assert_eq!(msg, "pedidoId e metodoPagamento são obrigatórios."),
                other => panic!("esperava 400, veio {other:?}"),
            }
        }
    }

    #[test]
    fn pix_dispensa_cartao() {
        let solicitacao = validar_solicitacao(&payload(Some(42), Some(MetodoPagamento::Pix), None)).unwrap();
        assert_eq!(solicitacao.pedido_id, 42);
        assert!(solicitacao.cartao.is_none());
    }

    #[test]
    fn cartao_de_credito_exige_todos_os_campos() {
        let mut incompleto = cartao_completo();
        incompleto.expiry_year = None;

        for cartao in [None, Some(incompleto)] {
            match validar_solicitacao(&payload(Some(42), Some(MetodoPagamento::CreditCard), cartao)) {
                Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Dados do cartão incompletos."),
                other => panic!("esperava 400, veio {other:?}"),
            }
        }

        let ok = validar_solicitacao(&payload(Some(42), Some(MetodoPagamento::CreditCard), Some(cartao_completo())))
            .unwrap();
        assert_eq!(ok.cartao.unwrap().number, "5162306219378829");
    }
}

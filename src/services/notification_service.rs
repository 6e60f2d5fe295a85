use crate::error::{AppError, AppResult};
use crate::external::{EmailMessage, ResendService};
use crate::models::Order;

#[derive(Clone)]
pub struct NotificationService {
    resend: ResendService,
}

impl NotificationService {
    pub fn new(resend: ResendService) -> Self {
        Self { resend }
    }

    /// Send the confirmation email for an order to its client. Returns the
    /// provider's message id.
    pub async fn send_order_confirmation(&self, order: &Order) -> AppResult<String> {
        let to = order
            .email
            .clone()
            .ok_or_else(|| AppError::ValidationError("client has no email address".to_string()))?;

        let message = EmailMessage {
            to,
            subject: format!("Confirmation de votre commande {}", order.invoice_number),
            html: order_confirmation_html(order),
        };
        self.resend.send_email(&message).await
    }
}

/// Confirmation email body. Kept as inline HTML with the studio's styling,
/// one row per line item.
pub fn order_confirmation_html(order: &Order) -> String {
    let rows: String = order
        .products
        .iter()
        .map(|p| {
            format!(
                r#"              <tr>
                <td style="padding: 12px; border-bottom: 1px solid #dee2e6;">{}</td>
                <td style="padding: 12px; border-bottom: 1px solid #dee2e6;">{}</td>
              </tr>
"#,
                p.name, p.reference
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Confirmation de commande</title>
  </head>
  <body style="font-family: sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
      <h2>Bonjour {customer},</h2>
      <p>Nous avons bien re&ccedil;u votre commande n&deg;{invoice} du {date}.</p>

      <h3>D&eacute;tails de votre commande :</h3>
      <table style="width: 100%; border-collapse: collapse; margin: 20px 0;">
        <thead>
          <tr style="background-color: #f8f9fa;">
            <th style="padding: 12px; text-align: left; border-bottom: 2px solid #dee2e6;">Produit</th>
            <th style="padding: 12px; text-align: left; border-bottom: 2px solid #dee2e6;">R&eacute;f&eacute;rence</th>
          </tr>
        </thead>
        <tbody>
{rows}        </tbody>
      </table>

      <p style="font-size: 18px; font-weight: bold;">
        Total : {total} &euro;
      </p>

      <p>Nous vous contacterons prochainement pour convenir d'une date de livraison qui vous conviendra.</p>

      <p style="margin-top: 30px;">Merci de votre confiance !</p>
    </div>
  </body>
</html>"#,
        customer = order.customer_name,
        invoice = order.invoice_number,
        date = order.date.format("%d/%m/%Y"),
        rows = rows,
        total = order.total_amount,
    )
}

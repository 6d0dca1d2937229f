use poise::serenity_prelude as serenity;
use tracing::{debug, error};

use pizzahat_commands::tickets::panel::{
    TICKET_ARCHIVED_MESSAGE, TICKET_OPEN_FAILED_MESSAGE, TICKET_REOPENED_MESSAGE, TicketButton,
    staff_role_for_ticket, ticket_opened_message, ticket_thread_name,
};
use pizzahat_core::Data;
use pizzahat_database::impls::staff_role::get_staff_role_id;

/// Route presses of the persistent ticket buttons. Other component
/// interactions (pagination) are left to their collectors.
pub async fn handle_ticket_interaction(
    ctx: &serenity::Context,
    data: &Data,
    interaction: &serenity::ComponentInteraction,
) {
    let Some(button) = TicketButton::from_custom_id(&interaction.data.custom_id) else {
        return;
    };

    let result = match button {
        TicketButton::Create => open_ticket(ctx, data, interaction).await,
        TicketButton::Close => set_thread_closed(ctx, interaction, true).await,
        TicketButton::Reopen => set_thread_closed(ctx, interaction, false).await,
    };

    if let Err(source) = result {
        error!(
            ?source,
            ?button,
            channel_id = interaction.channel_id.get(),
            "ticket interaction failed"
        );
    }
}

async fn open_ticket(
    ctx: &serenity::Context,
    data: &Data,
    interaction: &serenity::ComponentInteraction,
) -> Result<(), serenity::Error> {
    let Some(guild_id) = interaction.guild_id else {
        return Ok(());
    };

    interaction.defer_ephemeral(ctx).await?;

    let lookup = get_staff_role_id(&data.db, guild_id.get()).await;
    if let Err(source) = &lookup {
        error!(?source, guild_id = guild_id.get(), "failed to load staff role");
    }
    let staff_role = match staff_role_for_ticket(lookup) {
        Ok(role) => role,
        Err(message) => return edit_deferred(ctx, interaction, message).await,
    };

    let opener = &interaction.user;
    let reason = format!("Ticket created by {}", opener.name);
    let created = interaction
        .channel_id
        .create_thread(
            ctx,
            serenity::CreateThread::new(ticket_thread_name(&opener.name))
                .kind(serenity::ChannelType::PrivateThread)
                .invitable(false)
                .audit_log_reason(&reason),
        )
        .await;
    let thread = match created {
        Ok(thread) => thread,
        Err(source) => {
            error!(?source, guild_id = guild_id.get(), "ticket thread creation failed");
            return edit_deferred(ctx, interaction, TICKET_OPEN_FAILED_MESSAGE).await;
        }
    };

    if let Err(source) = thread.id.add_thread_member(ctx, opener.id).await {
        error!(?source, thread_id = thread.id.get(), "failed to add ticket opener");
        return edit_deferred(ctx, interaction, TICKET_OPEN_FAILED_MESSAGE).await;
    }
    debug!(
        guild_id = guild_id.get(),
        thread_id = thread.id.get(),
        user_id = opener.id.get(),
        "ticket opened"
    );

    edit_deferred(
        ctx,
        interaction,
        &format!("Ticket created in <#{}>", thread.id.get()),
    )
    .await?;

    thread
        .id
        .send_message(ctx, ticket_opened_message(staff_role, opener))
        .await?;

    Ok(())
}

async fn edit_deferred(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    content: &str,
) -> Result<(), serenity::Error> {
    interaction
        .edit_response(ctx, serenity::EditInteractionResponse::new().content(content))
        .await?;
    Ok(())
}

async fn set_thread_closed(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    closed: bool,
) -> Result<(), serenity::Error> {
    let edit = serenity::EditThread::new().archived(closed).locked(closed);

    // A locked, archived thread can't take the reply, so close after answering.
    if closed {
        respond(ctx, interaction, TICKET_ARCHIVED_MESSAGE).await?;
        interaction.channel_id.edit_thread(ctx, edit).await?;
    } else {
        interaction.channel_id.edit_thread(ctx, edit).await?;
        respond(ctx, interaction, TICKET_REOPENED_MESSAGE).await?;
    }

    Ok(())
}

async fn respond(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    content: &str,
) -> Result<(), serenity::Error> {
    interaction
        .create_response(
            ctx,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new().content(content),
            ),
        )
        .await
}
